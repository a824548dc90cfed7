use crate::Result;
use crate::facts::FetchResult;
use core::fmt::Write;

pub fn generate<W: Write>(results: &[FetchResult], writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", serde_json::to_string_pretty(results)?)?;
    Ok(())
}
