// Per-download scratch files. Each download gets its own uniquely named file,
// removed when the handle drops.

use std::path::Path;

use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::Result;

pub(crate) struct ScratchPdf {
    file: NamedTempFile,
}

impl ScratchPdf {
    pub(crate) fn create(dir: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("papercast-").suffix(".pdf");
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(Self { file })
    }

    pub(crate) fn path(&self) -> &Path {
        self.file.path()
    }

    /// Stream a response body into the file. Returns bytes written.
    pub(crate) async fn write_response(&self, mut resp: reqwest::Response) -> Result<u64> {
        let mut out = tokio::fs::File::from_std(self.file.reopen()?);
        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;
        Ok(written)
    }

    pub(crate) async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.path()).await?)
    }
}
