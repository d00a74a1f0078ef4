//! The `audit` command: the same normalization pass as `clean`, but only
//! the report is produced. Nothing is written back, so it is safe to run
//! against files of unknown quality.

use anyhow::Result;
use log::info;

use crate::{
    cli::AuditArgs,
    fields::{self, FieldMap, FieldMapError},
    io_utils,
    pipeline::RecordPipeline,
};

pub fn execute(args: &AuditArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Auditing '{}' (delimiter '{}')",
        args.input.display(),
        crate::printable_delimiter(delimiter)
    );

    let (headers, rows) = io_utils::read_table(&args.input, delimiter, encoding, args.limit)?;
    let overrides = fields::collect_overrides(args.fieldmap.as_deref(), &args.map)?;
    let field_map = FieldMap::resolve(&headers, &overrides)?;
    if field_map.is_empty() {
        return Err(FieldMapError::NoRolesResolved.into());
    }

    let outcome = RecordPipeline::new(field_map).run(&headers, rows);
    outcome.report.render_console();
    if let Some(report_path) = args.report.as_deref() {
        outcome.report.save_json(report_path)?;
        info!("Wrote cleaning report to {report_path:?}");
    }
    info!("Audited {} row(s) from {:?}", outcome.report.rows, args.input);
    Ok(())
}
