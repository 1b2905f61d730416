use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use mic_transcribe::cli::Cli;
use mic_transcribe::config::Config;
use mic_transcribe::output::OutputPath;
use mic_transcribe::recorder::Recorder;
use mic_transcribe::transcribe::transcribe_or_none;
use mic_transcribe::whisper_api::WhisperClient;

#[tokio::main]
async fn main() -> Result<()> {
    // ロガーを初期化
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    // デバイス一覧表示モード
    if cli.show_devices {
        Recorder::list_devices()?;
        return Ok(());
    }

    // 設定ファイル生成モード
    if cli.generate_config {
        Config::write_default(&cli.config)?;
        println!("設定ファイルを生成しました: {:?}", cli.config);
        return Ok(());
    }

    // 設定を読み込み、CLI引数で上書き
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_to(&mut config);

    log::info!("mic-transcribe を起動します");
    log::debug!("設定: {:?}", config);

    // 文字起こしクライアントを構築（認証情報は起動時に注入）
    let transcriber = WhisperClient::new(config.whisper.clone())?;

    // 出力先を決定（--save 指定時は永続パス、それ以外は一時ファイル）
    // 一時ファイルはoutputのドロップ時に必ず削除される
    let output = match cli.save {
        Some(ref path) => OutputPath::saved(path),
        None => OutputPath::temporary()?,
    };

    // 録音（デバイスエラーは致命的としてそのまま伝播）
    let recorder = Recorder::new(&config.record)?;
    recorder.record(output.path(), config.record.duration_secs)?;

    if !output.is_temporary() {
        log::info!("録音ファイルを保存しました: {:?}", output.path());
    }

    // 文字起こし（エラーは回復可能境界で捕捉済み）
    match transcribe_or_none(&transcriber, output.path()).await {
        Some(text) => println!("文字起こし結果: {}", text),
        None => println!("文字起こし結果はありません"),
    }

    Ok(())
}
