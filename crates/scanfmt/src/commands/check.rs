//! `scanfmt check` -- confirm a scan survives load, save and reload.

use anyhow::{Context, Result, bail};
use scan_fieldset::{FieldSet, is_equal};

use crate::cli::DocumentArgs;
use crate::commands::load_field_set;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `scanfmt check` command.
///
/// Fails unless the re-saved formula loads into a field set equal to the
/// first one and saving that set again gives the same formula.
pub fn run(ctx: &RuntimeContext, args: &DocumentArgs) -> Result<()> {
    let (document, field_set) = load_field_set(ctx, args)?;
    let label = document.label(&args.file);
    let resaved = field_set.create_formula_node();

    let mut reloaded = FieldSet::new().with_options(ctx.load_options(args));
    reloaded
        .load(&resaved)
        .with_context(|| format!("re-saved formula of '{label}' does not load: {resaved}"))?;

    if !is_equal(&field_set, &reloaded) {
        bail!("re-saved formula of '{label}' loads to different fields: {resaved}");
    }
    let saved_twice = reloaded.create_formula_node();
    if saved_twice != resaved {
        bail!("saving '{label}' twice changed the formula: {resaved} became {saved_twice}");
    }

    if ctx.json {
        output_json(&serde_json::json!({
            "name": label,
            "ok": true,
            "fields": field_set.field_count(),
        }));
    } else if !ctx.quiet {
        println!("ok: {label} ({} fields)", field_set.field_count());
    }
    Ok(())
}
