use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// コマンドライン引数
///
/// 指定された値は設定ファイルの値を上書きする。
/// 優先順位: CLI引数 > 設定ファイル > 組み込みデフォルト
#[derive(Parser, Debug)]
#[command(name = "mic-transcribe")]
#[command(about = "マイクから録音してWhisper APIで文字起こしするツール")]
#[command(version)]
pub struct Cli {
    /// 録音時間（秒）
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub duration: Option<u64>,

    /// サンプリングレート (Hz)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub sample_rate: Option<u32>,

    /// 言語コード（"ru", "ja" など。検証せずそのままAPIに渡す）
    #[arg(long)]
    pub language: Option<String>,

    /// 録音WAVの保存先（指定時はファイルを削除せず保持する）
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// OpenAI API キー（省略時は設定ファイル → 環境変数 OPENAI_API_KEY）
    #[arg(long)]
    pub api_key: Option<String>,

    /// APIのベースURL（互換エンドポイントへの切り替え用）
    #[arg(long)]
    pub base_url: Option<String>,

    /// Whisper モデル名
    #[arg(long)]
    pub model: Option<String>,

    /// 入力デバイス名（省略時はシステムのデフォルトデバイス）
    #[arg(long)]
    pub device: Option<String>,

    /// 設定ファイルのパス
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    /// デフォルト設定ファイルを生成して終了
    #[arg(long)]
    pub generate_config: bool,

    /// 利用可能な入力デバイス一覧を表示して終了
    #[arg(long)]
    pub show_devices: bool,
}

impl Cli {
    /// CLI引数を設定に反映
    ///
    /// 指定された引数のみを上書きし、未指定の項目は設定ファイルの
    /// 値（またはデフォルト値）を維持する。
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(duration) = self.duration {
            config.record.duration_secs = duration;
        }
        if let Some(sample_rate) = self.sample_rate {
            config.record.sample_rate = sample_rate;
        }
        if let Some(ref device) = self.device {
            config.record.device_id = device.clone();
        }
        if let Some(ref language) = self.language {
            config.whisper.language = language.clone();
        }
        if let Some(ref api_key) = self.api_key {
            config.whisper.api_key = Some(api_key.clone());
        }
        if let Some(ref base_url) = self.base_url {
            config.whisper.base_url = base_url.clone();
        }
        if let Some(ref model) = self.model {
            config.whisper.model = model.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["mic-transcribe"]);
        assert!(cli.duration.is_none());
        assert!(cli.language.is_none());
        assert!(cli.save.is_none());
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert!(!cli.generate_config);
        assert!(!cli.show_devices);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::parse_from([
            "mic-transcribe",
            "--duration",
            "15",
            "--sample-rate",
            "16000",
            "--language",
            "ja",
            "--save",
            "/tmp/out.wav",
            "--api-key",
            "sk-test",
            "--base-url",
            "https://api.lemonfox.ai/v1",
            "--model",
            "whisper-1",
        ]);

        assert_eq!(cli.duration, Some(15));
        assert_eq!(cli.sample_rate, Some(16000));
        assert_eq!(cli.language.as_deref(), Some("ja"));
        assert_eq!(cli.save, Some(PathBuf::from("/tmp/out.wav")));
        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cli.base_url.as_deref(), Some("https://api.lemonfox.ai/v1"));
        assert_eq!(cli.model.as_deref(), Some("whisper-1"));
    }

    #[test]
    fn test_duration_zero_rejected() {
        // 録音時間 0 は受け付けない
        let result = Cli::try_parse_from(["mic-transcribe", "--duration", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_to_overrides_config() {
        let cli = Cli::parse_from([
            "mic-transcribe",
            "--duration",
            "10",
            "--language",
            "en",
            "--api-key",
            "sk-cli",
        ]);

        let mut config = Config::default();
        cli.apply_to(&mut config);

        // CLIで指定した値
        assert_eq!(config.record.duration_secs, 10);
        assert_eq!(config.whisper.language, "en");
        assert_eq!(config.whisper.api_key.as_deref(), Some("sk-cli"));

        // 未指定の項目はデフォルトのまま
        assert_eq!(config.record.sample_rate, 44100);
        assert_eq!(config.whisper.model, "whisper-1");
    }

    #[test]
    fn test_language_passed_through_unvalidated() {
        // 言語コードは検証せずそのまま保持する
        let cli = Cli::parse_from(["mic-transcribe", "--language", "xx-not-a-language"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config.whisper.language, "xx-not-a-language");
    }
}
