use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// 録音ファイルの出力先
///
/// 一時ファイルの場合はこの値のドロップ時に自動削除される。
/// 文字起こしの成否やパニックの有無に関わらず、パス取得後の
/// すべての終了経路でクリーンアップが保証される。
/// `--save` で指定された永続パスは削除されない。
#[derive(Debug)]
pub enum OutputPath {
    /// 一意な名前の一時ファイル（ドロップ時に削除）
    Temporary(TempPath),
    /// ユーザー指定の永続パス（削除しない）
    Saved(PathBuf),
}

impl OutputPath {
    /// 一意な名前の一時WAVパスを取得
    ///
    /// # Errors
    ///
    /// 一時ファイルの作成に失敗した場合にエラーを返す。
    pub fn temporary() -> Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix("mic-transcribe-")
            .suffix(".wav")
            .tempfile()
            .with_context(|| "一時ファイルの作成に失敗")?;
        Ok(Self::Temporary(temp.into_temp_path()))
    }

    /// ユーザー指定の永続パスを使用
    pub fn saved<P: Into<PathBuf>>(path: P) -> Self {
        Self::Saved(path.into())
    }

    /// 出力先のパス
    pub fn path(&self) -> &Path {
        match self {
            Self::Temporary(temp) => temp,
            Self::Saved(path) => path,
        }
    }

    /// 一時ファイルかどうか
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }
}
