use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub record: RecordConfig,
    #[serde(default)]
    pub whisper: WhisperConfig,
}

/// 録音設定
///
/// マイクからの録音に関する設定。
///
/// # デフォルト値
///
/// - `duration_secs`: 5 秒
/// - `sample_rate`: 44100 Hz (44.1kHz)
/// - `device_id`: "default" (システムのデフォルト入力デバイス)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordConfig {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_device_id")]
    pub device_id: String,
}

/// OpenAI Whisper API 設定
///
/// 文字起こしエンドポイントに関する設定。
///
/// # デフォルト値
///
/// - `model`: "whisper-1"
/// - `language`: "ru" (ロシア語)
/// - `base_url`: "https://api.openai.com/v1"
///
/// `api_key` が未設定の場合は環境変数 `OPENAI_API_KEY` が使用される。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhisperConfig {
    /// OpenAI API Key（省略時は環境変数から解決）
    pub api_key: Option<String>,
    /// Whisper モデル名（通常 "whisper-1"）
    #[serde(default = "default_whisper_model")]
    pub model: String,
    /// 言語コード（"ru", "ja", "en" など）。そのままAPIに渡される
    #[serde(default = "default_language")]
    pub language: String,
    /// APIのベースURL（互換エンドポイントへの切り替え用）
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

// Default functions
fn default_duration_secs() -> u64 {
    5
}

fn default_sample_rate() -> u32 {
    44100 // CDと同じ44.1kHz
}

fn default_device_id() -> String {
    "default".to_string()
}

fn default_whisper_model() -> String {
    "whisper-1".to_string()
}

fn default_language() -> String {
    "ru".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            record: RecordConfig::default(),
            whisper: WhisperConfig::default(),
        }
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            sample_rate: default_sample_rate(),
            device_id: default_device_id(),
        }
    }
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            api_key: None, // デフォルトでは環境変数から解決
            model: default_whisper_model(),
            language: default_language(),
            base_url: default_base_url(),
        }
    }
}

impl WhisperConfig {
    /// APIキーを解決
    ///
    /// 設定値が優先され、未設定の場合は環境変数 `OPENAI_API_KEY` に
    /// フォールバックする。空文字列は未設定として扱う。
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

impl Config {
    /// 設定ファイルから読み込み
    ///
    /// TOML形式の設定ファイルをパースしてConfig構造体を生成する。
    ///
    /// # Arguments
    ///
    /// * `path` - 設定ファイルのパス
    ///
    /// # Errors
    ///
    /// ファイルの読み込みまたはパースに失敗した場合にエラーを返す。
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mic_transcribe::config::Config;
    /// let config = Config::from_file("config.toml").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("設定ファイルの読み込みに失敗: {:?}", path.as_ref()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "設定ファイルのパースに失敗")?;
        Ok(config)
    }

    /// デフォルト設定をファイルに書き出し
    ///
    /// デフォルト値を持つ設定ファイルを生成する。
    /// 既存のファイルは上書きされる。
    ///
    /// # Errors
    ///
    /// ファイルの書き込みに失敗した場合にエラーを返す。
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Config::default();
        let content =
            toml::to_string_pretty(&config).with_context(|| "設定のシリアライズに失敗")?;
        fs::write(path.as_ref(), content)
            .with_context(|| format!("設定ファイルの書き込みに失敗: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// 設定ファイルがあれば読み込み、なければデフォルトを使用
    ///
    /// ファイルが存在するがパースに失敗した場合はエラーになる。
    /// ファイルが存在しない場合はエラーにならず、デフォルト設定を返す。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            log::debug!(
                "設定ファイルが見つかりません。デフォルト設定を使用します: {:?}",
                path.as_ref()
            );
            Ok(Config::default())
        }
    }
}
