//! Command handlers, one module per subcommand.

pub mod check;
pub mod config_cmd;
pub mod fields;
pub mod resave;

use anyhow::{Context, Result};
use scan_fieldset::FieldSet;

use crate::cli::DocumentArgs;
use crate::context::RuntimeContext;
use crate::document::{ScanDocument, load_document};

/// Read the document named by `args` and load its formula into a fresh field set.
pub(crate) fn load_field_set(
    ctx: &RuntimeContext,
    args: &DocumentArgs,
) -> Result<(ScanDocument, FieldSet)> {
    let document = load_document(&args.file)?;
    let mut field_set = FieldSet::new().with_options(ctx.load_options(args));
    field_set
        .load(&document.formula)
        .with_context(|| format!("cannot load scan '{}'", document.label(&args.file)))?;
    Ok((document, field_set))
}
