//! The update pipeline: read the roster, run every fill pass, write it back.

use crate::api::{GeoclientClient, OpenDataClient};
use crate::cacher;
use crate::config::{Credentials, StudentFolder};
use crate::error::Result;
use crate::sheet::{self, SheetColumns};
use crate::writers::address::lookup_address_fields;
use crate::writers::assessment::FolderStore;
use crate::writers::{update_address_fields, update_assessments, update_sheet_file_data};

/// Run the full update: address fields, assessments, then one file-link pass
/// per scan folder. The roster is written back once at the end; each cache
/// document is saved after its pass.
pub fn run_update(creds: &Credentials) -> Result<()> {
    let columns = SheetColumns::load(&creds.roster.columns)?;
    let mut grid = sheet::read_sheet(&creds.roster.sheet, &columns)?;
    log::info!("loaded roster: {} students", grid.row_count());

    let geoclient = GeoclientClient::new(
        creds.api.geoclient.app_id.clone(),
        creds.api.geoclient.secret_key.clone(),
    );
    let open_data = OpenDataClient::new(creds.api.open_data.app_token.clone());
    grid = update_address_fields(&grid, |address| {
        lookup_address_fields(&geoclient, &open_data, address)
    })?;

    let mut store = FolderStore::open(&creds.folders.assessments, &creds.assessment_template)?;
    grid = update_assessments(&grid, &mut store)?;

    for folder in StudentFolder::ALL {
        let mut cache = cacher::reconciled_cache_for(folder.dir(creds), folder.cache_path(creds))?;
        grid = update_sheet_file_data(&grid, &cache, folder.field())?;
        cache.save()?;
    }

    sheet::write_sheet(&grid, &creds.roster.sheet)?;
    log::info!("roster written back to {}", creds.roster.sheet.display());
    Ok(())
}

/// Reconcile one folder's cache document and save it.
pub fn run_reconcile(creds: &Credentials, folder: StudentFolder) -> Result<()> {
    let mut cache = cacher::reconciled_cache_for(folder.dir(creds), folder.cache_path(creds))?;
    cache.save()?;
    log::info!(
        "reconciled {} entries into {}",
        cache.len(),
        folder.cache_path(creds).display()
    );
    Ok(())
}

/// Print the roster grid to stdout.
pub fn run_show(creds: &Credentials) -> Result<()> {
    let columns = SheetColumns::load(&creds.roster.columns)?;
    let grid = sheet::read_sheet(&creds.roster.sheet, &columns)?;
    for row in grid.values() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        println!("{}", cells.join(" | "));
    }
    Ok(())
}
