use crate::cli::HistoryArgs;
use crate::commands::{Console, Output};
use crate::error::Result;
use crate::filters::HistorySearch;

pub async fn run(args: HistoryArgs, console: &Console, out: Output) -> Result<()> {
    let search = HistorySearch::from(args);
    let page = search.run(console).await?;
    // The page layout belongs to the backend; print it as-is.
    out.emit(&page, || {
        serde_json::to_string_pretty(&page).unwrap_or_else(|_| page.to_string())
    });
    Ok(())
}
