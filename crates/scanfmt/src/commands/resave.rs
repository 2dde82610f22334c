//! `scanfmt resave` -- load a scan and save it back as a formula.

use anyhow::Result;

use crate::cli::ResaveArgs;
use crate::commands::load_field_set;
use crate::context::RuntimeContext;
use crate::document::{ScanDocument, save_document};
use crate::output::output_json;

/// Execute the `scanfmt resave` command.
pub fn run(ctx: &RuntimeContext, args: &ResaveArgs) -> Result<()> {
    let (document, field_set) = load_field_set(ctx, &args.document)?;
    let resaved = ScanDocument {
        formula: field_set.create_formula_node(),
        ..document
    };

    if let Some(output) = &args.output {
        save_document(output, &resaved)?;
        tracing::info!(path = %output.display(), "wrote re-saved document");
    }

    if ctx.json {
        output_json(&resaved);
    } else {
        println!("{}", resaved.formula);
    }
    Ok(())
}
