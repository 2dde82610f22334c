//! `scanfmt fields` -- print the fields a scan loads to.

use anyhow::Result;

use crate::cli::DocumentArgs;
use crate::commands::load_field_set;
use crate::context::RuntimeContext;
use crate::output::{FieldsView, output_json, print_fields};

/// Execute the `scanfmt fields` command.
pub fn run(ctx: &RuntimeContext, args: &DocumentArgs) -> Result<()> {
    let (document, field_set) = load_field_set(ctx, args)?;

    if ctx.json {
        output_json(&FieldsView {
            name: (!document.name.is_empty()).then_some(document.name.as_str()),
            fields: field_set.iter().collect(),
        });
    } else {
        if !ctx.quiet {
            println!("{}", document.label(&args.file));
        }
        print_fields(field_set.iter());
    }
    Ok(())
}
