use crate::config::RecordConfig;
use crate::types::SampleI16;
use crate::wav_writer::WavFileWriter;
use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SizedSample};
use crossbeam_channel::Sender;
use std::path::Path;
use std::time::{Duration, Instant};

/// デバイス起動の遅延を見込んだ受信タイムアウトの余裕（秒）
const CAPTURE_GRACE_SECS: u64 = 5;

/// マイクからの固定時間録音
///
/// システムの入力デバイスからモノラル16ビットPCMで録音し、
/// WAVファイルとして書き出す。デバイスが利用できない場合の
/// エラーは回復不能として呼び出し元に伝播する。
pub struct Recorder {
    device: cpal::Device,
    sample_rate: u32,
}

impl Recorder {
    /// 新しいRecorderを作成
    ///
    /// # Errors
    ///
    /// 入力デバイスが見つからない場合にエラーを返す。
    pub fn new(config: &RecordConfig) -> Result<Self> {
        let host = cpal::default_host();

        // デバイスを取得
        let device = if config.device_id == "default" {
            host.default_input_device()
                .context("デフォルト入力デバイスが見つかりません")?
        } else {
            // デバイス名が指定されている場合は、デバイス一覧から検索
            host.input_devices()
                .context("入力デバイス一覧の取得に失敗")?
                .find(|d| d.name().ok().as_deref() == Some(&config.device_id))
                .with_context(|| format!("デバイスが見つかりません: {}", config.device_id))?
        };

        log::info!("入力デバイス: {:?}", device.name());

        Ok(Self {
            device,
            sample_rate: config.sample_rate,
        })
    }

    /// 指定時間ぶんの音声を録音してWAVファイルに書き出す
    ///
    /// 録音時間が経過するまで呼び出しスレッドをブロックする。
    /// 完了時点で `path` のWAVファイルは確定済み（クローズ済み）となる。
    ///
    /// # Arguments
    ///
    /// * `path` - 出力先のWAVファイルパス（既存ファイルは上書き）
    /// * `duration_secs` - 録音時間（秒）
    ///
    /// # Errors
    ///
    /// ストリームの構築・開始に失敗した場合、またはデバイスから
    /// 音声データが時間内に届かない場合にエラーを返す。
    pub fn record(&self, path: &Path, duration_secs: u64) -> Result<()> {
        // デバイスのデフォルトフォーマットを取得
        let default_config = self
            .device
            .default_input_config()
            .context("デフォルト入力設定が取得できません")?;

        log::info!(
            "デバイス設定: {:?}, {}Hz, {}ch",
            default_config.sample_format(),
            default_config.sample_rate().0,
            default_config.channels()
        );

        // モノラル・要求サンプルレートでストリーム設定を作成
        let stream_config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (tx, rx) = crossbeam_channel::unbounded::<Vec<SampleI16>>();

        let stream = match default_config.sample_format() {
            cpal::SampleFormat::F32 => self.build_stream::<f32>(&stream_config, tx)?,
            cpal::SampleFormat::I16 => self.build_stream::<i16>(&stream_config, tx)?,
            cpal::SampleFormat::U16 => self.build_stream::<u16>(&stream_config, tx)?,
            cpal::SampleFormat::I32 => self.build_stream::<i32>(&stream_config, tx)?,
            _ => anyhow::bail!("サポートされていないサンプルフォーマット"),
        };

        stream.play().context("ストリームの再生開始に失敗")?;

        log::info!("録音中... ({}秒, {}Hz)", duration_secs, self.sample_rate);

        let target_samples = (self.sample_rate as u64 * duration_secs) as usize;
        let deadline = Instant::now()
            + Duration::from_secs(duration_secs)
            + Duration::from_secs(CAPTURE_GRACE_SECS);

        let mut writer = WavFileWriter::create(path, self.sample_rate)?;

        // 必要サンプル数に達するまで受信して書き込む
        while writer.samples_written() < target_samples {
            let remaining = target_samples - writer.samples_written();
            match rx.recv_deadline(deadline) {
                Ok(samples) => {
                    let take = remaining.min(samples.len());
                    writer.write_samples(&samples[..take])?;
                }
                Err(_) => {
                    anyhow::bail!(
                        "録音デバイスから音声データが時間内に届きませんでした ({}/{}サンプル)",
                        writer.samples_written(),
                        target_samples
                    );
                }
            }
        }

        // ストリームを停止してからファイルを確定
        drop(stream);
        writer.finalize()?;

        log::info!("録音完了: {:?} ({:.2}秒)", path, writer.duration_seconds());

        Ok(())
    }

    /// ストリームを構築
    ///
    /// デバイスのネイティブフォーマットをi16に変換して送信する。
    fn build_stream<T>(
        &self,
        config: &cpal::StreamConfig,
        tx: Sender<Vec<SampleI16>>,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample + Sample + Send + 'static,
        <T as Sample>::Float: Into<f32>,
    {
        let data_callback = move |data: &[T], _info: &cpal::InputCallbackInfo| {
            let samples: Vec<SampleI16> = data
                .iter()
                .map(|&sample| to_i16_sample(sample.to_float_sample().into()))
                .collect();

            // 受信側が終了済みの場合は無視（録音完了後に届いたコールバック）
            let _ = tx.send(samples);
        };

        let error_callback = move |err| {
            log::error!("ストリームエラー: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(config, data_callback, error_callback, None)
            .context("入力ストリームの構築に失敗")?;

        Ok(stream)
    }

    /// 利用可能な入力デバイス一覧を表示
    pub fn list_devices() -> Result<()> {
        let host = cpal::default_host();
        println!("利用可能な入力デバイス:");
        println!();

        for (idx, device) in host
            .input_devices()
            .context("入力デバイス一覧の取得に失敗")?
            .enumerate()
        {
            let name = device.name()?;
            println!("  [{}] {}", idx, name);

            device.supported_input_configs()?.for_each(|config_range| {
                println!(
                    "      フォーマット: {:?}, {}-{}Hz, {}ch",
                    config_range.sample_format(),
                    config_range.min_sample_rate().0,
                    config_range.max_sample_rate().0,
                    config_range.channels()
                );
            });
            println!();
        }

        Ok(())
    }
}

/// f32サンプル（-1.0〜1.0）をi16に変換
///
/// 範囲外の値はクランプする。
fn to_i16_sample(f: f32) -> SampleI16 {
    let clamped = f.clamp(-1.0, 1.0);
    (clamped * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_i16_sample_zero() {
        assert_eq!(to_i16_sample(0.0), 0);
    }

    #[test]
    fn test_to_i16_sample_full_scale() {
        assert_eq!(to_i16_sample(1.0), i16::MAX);
        assert_eq!(to_i16_sample(-1.0), -i16::MAX);
    }

    #[test]
    fn test_to_i16_sample_clamps_out_of_range() {
        // 範囲外の入力はクランプされる
        assert_eq!(to_i16_sample(2.5), i16::MAX);
        assert_eq!(to_i16_sample(-2.5), -i16::MAX);
    }

    #[test]
    fn test_to_i16_sample_half_scale() {
        let half = to_i16_sample(0.5);
        assert!((half - i16::MAX / 2).abs() <= 1);
    }
}
