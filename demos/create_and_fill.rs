// Walkthrough of the gateway: create a file in a Drive folder, append rows
// to a spreadsheet, then read the data back as a headered table.
//
// Expects GOOGLE_APPLICATION_CREDENTIALS to point at a service-account key
// with access to the folder/spreadsheet links passed on the command line:
//
//   cargo run --example create_and_fill -- <folder-link> <spreadsheet-link>

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::json;

use gworkspace::core::gateway::{DRIVE_SCOPE, SHEETS_SCOPE};
use gworkspace::infra::drive::{shareable_link, FileKind};
use gworkspace::{DocumentRef, DriveClient, ServiceAccountAuth, SheetsClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(folder_link), Some(spreadsheet_link)) = (args.next(), args.next()) else {
        bail!("usage: create_and_fill <folder-link> <spreadsheet-link>");
    };

    let drive_auth = ServiceAccountAuth::from_env(&[DRIVE_SCOPE])
        .await
        .context("loading drive credentials")?;
    let sheets_auth = ServiceAccountAuth::from_env(&[SHEETS_SCOPE])
        .await
        .context("loading sheets credentials")?;

    let drive = DriveClient::new(Arc::new(drive_auth));
    let sheets = SheetsClient::new(Arc::new(sheets_auth));

    let folder = DocumentRef::link(folder_link);
    let spreadsheet = DocumentRef::link(spreadsheet_link);

    // Create an empty presentation in the folder.
    let file_id = drive
        .create_file("Test File", FileKind::Presentation, &folder)
        .await?;
    println!("created presentation {}", file_id);
    println!("access link: {}", shareable_link(&file_id));

    // Append a couple of rows to the spreadsheet.
    sheets
        .append_values(
            &spreadsheet,
            "Sheet1!A1",
            vec![
                vec![json!(2), json!("row two"), json!("data2")],
                vec![json!(3), json!("row three"), json!("data3")],
            ],
        )
        .await?;
    println!("appended rows");

    // Read the sheet back; headers are synthesized (A, B, C, …) since the
    // data has no header row.
    let table = sheets.get_table(&spreadsheet, None, None).await?;
    println!("columns: {}", table.headers.join(", "));
    for row in &table.rows {
        println!("{:?}", row);
    }

    Ok(())
}
