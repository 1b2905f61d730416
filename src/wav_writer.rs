use crate::types::{AudioFormat, SampleI16};
use anyhow::{Context, Result};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// 録音データのWAVファイル書き出し
///
/// 指定されたパスにモノラル16ビットPCMのWAVファイルを書き込む。
/// 既存のファイルは上書きされる。
pub struct WavFileWriter {
    path: PathBuf,
    writer: Option<hound::WavWriter<BufWriter<fs::File>>>,
    format: AudioFormat,
    samples_written: usize,
}

impl WavFileWriter {
    /// 指定パスにWAVファイルを作成
    ///
    /// # Arguments
    ///
    /// * `path` - 出力先のパス（親ディレクトリは存在している必要がある）
    /// * `sample_rate` - サンプリングレート (Hz)
    ///
    /// # Errors
    ///
    /// ファイルの作成に失敗した場合にエラーを返す。
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let format = AudioFormat::mono(sample_rate);

        let spec = hound::WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("WAVファイルの作成に失敗: {:?}", path))?;

        Ok(Self {
            path,
            writer: Some(writer),
            format,
            samples_written: 0,
        })
    }

    /// サンプルを書き込み
    pub fn write_samples(&mut self, samples: &[SampleI16]) -> Result<()> {
        if let Some(writer) = &mut self.writer {
            for &sample in samples {
                writer
                    .write_sample(sample)
                    .with_context(|| "WAVファイルへのサンプル書き込みに失敗")?;
            }
            self.samples_written += samples.len();
        }
        Ok(())
    }

    /// ファイルを確定して閉じる
    ///
    /// ヘッダのサンプル数を確定する。これを呼ばずにドロップした場合も
    /// ベストエフォートでファイナライズされる。
    pub fn finalize(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .with_context(|| "WAVファイルのファイナライズに失敗")?;
            log::info!(
                "WAVファイル書き込み完了: {:?}, {}サンプル ({:.2}秒)",
                self.path,
                self.samples_written,
                self.format.duration_seconds(self.samples_written)
            );
        }
        Ok(())
    }

    /// 出力先のパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 書き込んだサンプル数
    pub fn samples_written(&self) -> usize {
        self.samples_written
    }

    /// 書き込んだ時間（秒）
    pub fn duration_seconds(&self) -> f64 {
        self.format.duration_seconds(self.samples_written)
    }
}

impl Drop for WavFileWriter {
    fn drop(&mut self) {
        if self.writer.is_some() {
            if let Err(e) = self.finalize() {
                log::error!("WavFileWriter のドロップ時にエラー: {}", e);
            }
        }
    }
}
