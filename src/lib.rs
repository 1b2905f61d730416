//! mic-transcribe - マイク録音とWhisper文字起こしのCLIツール
//!
//! このクレートは、マイクから固定時間の音声を録音してWAVファイルに
//! 保存し、OpenAI Whisper API（または互換エンドポイント）で
//! 文字起こしを行うコマンドラインツールを提供します。
//!
//! # 主な機能
//!
//! - **固定時間録音**: モノラル16ビットPCMで指定秒数を録音
//! - **WAVファイル出力**: 一時ファイルまたは `--save` 指定の永続パスに保存
//! - **Whisper API連携**: 録音ファイルをmultipartで送信して文字起こし
//! - **一時ファイルの自動削除**: 文字起こしの成否に関わらずクリーンアップ
//!
//! # アーキテクチャ
//!
//! ```text
//! [CLI引数 + config.toml] → [Config]
//!                              ↓
//!        [OutputPath] ← [Orchestrator] → [WhisperClient]
//!             ↓                ↓                ↓
//!        [一時/永続パス] → [Recorder] → [WAVファイル] → [Whisper API]
//!                                                          ↓
//!                                                     [文字起こし結果]
//! ```
//!
//! 録音（致命的エラー）と文字起こし（回復可能エラー）は独立した
//! 機能としてオーケストレータが順次合成します。
//!
//! # 使用例
//!
//! ```no_run
//! use mic_transcribe::config::Config;
//!
//! // 設定ファイルを読み込み
//! let config = Config::load_or_default("config.toml").unwrap();
//!
//! // またはデフォルト設定を生成
//! Config::write_default("config.toml").unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod output;
pub mod recorder;
pub mod transcribe;
pub mod types;
pub mod wav_writer;
pub mod whisper_api;
