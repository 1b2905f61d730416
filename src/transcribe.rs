use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// 文字起こしバックエンドの共通トレイト
///
/// 録音済みの音声ファイルをテキストに変換する機能を表す。
/// 本番実装は [`crate::whisper_api::WhisperClient`]。
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// 音声ファイルを文字起こしする
    ///
    /// # Arguments
    ///
    /// * `path` - 存在する読み取り可能な音声ファイルのパス
    ///
    /// # Errors
    ///
    /// ネットワークエラー、認証エラー、レスポンスのパース失敗などで
    /// エラーを返す。
    async fn transcribe_file(&self, path: &Path) -> Result<String>;
}

/// 回復可能な文字起こし境界
///
/// エラーはここで捕捉してログに出力し、`None` に変換する。
/// 録音処理の致命的エラーとは異なり、文字起こしの失敗後も
/// プロセスは正常終了して一時ファイルのクリーンアップを行う。
pub async fn transcribe_or_none(backend: &dyn Transcriber, path: &Path) -> Option<String> {
    match backend.transcribe_file(path).await {
        Ok(text) => Some(text),
        Err(e) => {
            log::error!("文字起こしに失敗: {:#}", e);
            None
        }
    }
}
