//! Category command handlers.

use std::sync::Arc;

use tabled::Tabled;

use sitenav_core::{Category, Directory};

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Arc<Category>> for CategoryRow {
    fn from(c: &Arc<Category>) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
        }
    }
}

pub async fn handle(
    directory: &Directory,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CategoriesCommand::List => {
            directory.load_categories().await?;
            let snap = directory.store().categories_snapshot();
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |c| CategoryRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
