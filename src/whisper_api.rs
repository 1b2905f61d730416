use crate::config::WhisperConfig;
use crate::transcribe::Transcriber;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// OpenAI Whisper API レスポンス
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
}

/// OpenAI API エラーレスポンス
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI Whisper API クライアント
///
/// 音声ファイルを `{base_url}/audio/transcriptions` にmultipart形式で
/// 送信し、文字起こし結果を取得する。認証情報は構築時に注入される
/// （グローバルなクライアントは持たない）。
pub struct WhisperClient {
    config: WhisperConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl WhisperClient {
    /// 新しいWhisperClientを作成
    ///
    /// APIキーは設定値 → 環境変数 `OPENAI_API_KEY` の順で解決する。
    /// キーが未解決でも構築は成功し、リクエスト時にエラーとなる。
    ///
    /// # Errors
    ///
    /// HTTPクライアントの構築に失敗した場合にエラーを返す。
    pub fn new(config: WhisperConfig) -> Result<Self> {
        let api_key = config.resolved_api_key();
        if api_key.is_none() {
            log::warn!("APIキーが未設定です（--api-key または環境変数 OPENAI_API_KEY）");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Whisper API HTTPクライアント作成失敗")?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// 文字起こしエンドポイントのURL
    fn endpoint_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// 音声ファイルをバイナリモードで読み込む
    ///
    /// ファイルの内容をそのまま（変換なしで）返す。
    async fn load_audio(path: &Path) -> Result<(Vec<u8>, String)> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("音声ファイルの読み込みに失敗: {:?}", path))?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        Ok((bytes, filename))
    }

    /// multipartフォームを構築
    ///
    /// 言語コードは検証・変換せずそのまま `language` フィールドに渡す。
    fn build_form(&self, bytes: Vec<u8>, filename: String) -> Result<multipart::Form> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("audio/wav")?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("language", self.config.language.clone());

        Ok(form)
    }

    /// エラーレスポンス本文からメッセージを抽出
    ///
    /// OpenAI形式のJSONであれば `error.message` を、そうでなければ
    /// 本文をそのまま返す。
    fn error_message(body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(body) {
            parsed.error.message
        } else {
            body.to_string()
        }
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe_file(&self, path: &Path) -> Result<String> {
        let api_key = self.api_key.as_ref().context(
            "APIキーが設定されていません（--api-key または環境変数 OPENAI_API_KEY を設定してください）",
        )?;

        let (bytes, filename) = Self::load_audio(path).await?;

        log::info!(
            "文字起こし中: {} ({}バイト, model={}, language={})",
            filename,
            bytes.len(),
            self.config.model,
            self.config.language
        );

        let form = self.build_form(bytes, filename)?;

        let response = self
            .client
            .post(self.endpoint_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .multipart(form)
            .send()
            .await
            .context("Whisper API リクエスト失敗")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Whisper API エラー: {} - {}", status, Self::error_message(&body));
        }

        let whisper_response: WhisperResponse = response
            .json::<WhisperResponse>()
            .await
            .context("Whisper API レスポンスパース失敗")?;

        log::info!("文字起こし完了: {}文字", whisper_response.text.chars().count());

        Ok(whisper_response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config() -> WhisperConfig {
        WhisperConfig {
            api_key: Some("sk-test".to_string()),
            ..WhisperConfig::default()
        }
    }

    #[test]
    fn test_endpoint_url_default() {
        let client = WhisperClient::new(test_config()).unwrap();
        assert_eq!(
            client.endpoint_url(),
            "https://api.openai.com/v1/audio/transcriptions"
        );
    }

    #[test]
    fn test_endpoint_url_trailing_slash() {
        let config = WhisperConfig {
            base_url: "https://api.lemonfox.ai/v1/".to_string(),
            ..test_config()
        };
        let client = WhisperClient::new(config).unwrap();
        assert_eq!(
            client.endpoint_url(),
            "https://api.lemonfox.ai/v1/audio/transcriptions"
        );
    }

    #[tokio::test]
    async fn test_load_audio_returns_exact_bytes() -> Result<()> {
        // ファイルに書いたバイト列がそのまま送信データになること
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("sample.wav");
        let content: Vec<u8> = (0..=255).collect();
        fs::write(&path, &content)?;

        let (bytes, filename) = WhisperClient::load_audio(&path).await?;
        assert_eq!(bytes, content);
        assert_eq!(filename, "sample.wav");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_audio_missing_file() {
        let result = WhisperClient::load_audio(Path::new("/nonexistent/audio.wav")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_response_parse() {
        let json = r#"{"text": "Привет, мир"}"#;
        let parsed: WhisperResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text, "Привет, мир");
    }

    #[test]
    fn test_response_parse_extra_fields_ignored() {
        // verbose_json など追加フィールドがあってもtextのみ取り出す
        let json = r#"{"text": "hello", "language": "en", "duration": 5.0}"#;
        let parsed: WhisperResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text, "hello");
    }

    #[test]
    fn test_error_message_openai_format() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error"}}"#;
        assert_eq!(WhisperClient::error_message(body), "Invalid API key");
    }

    #[test]
    fn test_error_message_plain_body() {
        let body = "Service Unavailable";
        assert_eq!(WhisperClient::error_message(body), "Service Unavailable");
    }

    #[tokio::test]
    async fn test_transcribe_without_api_key_fails() {
        // 環境変数に依存しないよう直接構築する
        let client = WhisperClient {
            config: WhisperConfig::default(),
            api_key: None,
            client: reqwest::Client::new(),
        };

        let result = client.transcribe_file(Path::new("dummy.wav")).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("APIキー"));
    }
}
