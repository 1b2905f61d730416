/// 16ビット整数型のオーディオサンプル
///
/// PCM形式の音声データを表現するための型エイリアス。
/// -32768 から 32767 の範囲の値を取る。
pub type SampleI16 = i16;

/// オーディオフォーマット情報
///
/// 録音した音声データのサンプリングレートとチャンネル数を保持する。
///
/// # Examples
///
/// ```
/// # use mic_transcribe::types::AudioFormat;
/// let format = AudioFormat {
///     sample_rate: 44100, // 44.1kHz
///     channels: 1,        // モノラル
/// };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioFormat {
    /// サンプリングレート (Hz)
    ///
    /// 典型的な値: 8000, 16000, 44100, 48000
    pub sample_rate: u32,

    /// チャンネル数
    ///
    /// 1: モノラル, 2: ステレオ（本クレートでは常に 1）
    pub channels: u16,
}

impl AudioFormat {
    /// モノラルフォーマットを作成
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
        }
    }

    /// サンプル数から再生時間（秒）を計算
    pub fn duration_seconds(&self, num_samples: usize) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        num_samples as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}
