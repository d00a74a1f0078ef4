//! The `clean` command: runs the full normalization pass over one CSV
//! export and writes the repaired rows plus the appended audit columns.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::CleanArgs,
    fields::{self, FieldMap, FieldMapError},
    io_utils,
    pipeline::RecordPipeline,
    table,
};

pub fn execute(args: &CleanArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let input_encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_path = args.output.as_deref();
    let writing_to_stdout = output_path.is_none_or(io_utils::is_dash);
    let output_delimiter =
        io_utils::resolve_output_delimiter(output_path, args.output_delimiter, delimiter);
    let output_encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let use_table_output = args.table && writing_to_stdout;

    info!(
        "Cleaning '{}' -> {:?} (delimiter '{}', output '{}')",
        args.input.display(),
        output_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into()),
        crate::printable_delimiter(delimiter),
        crate::printable_delimiter(output_delimiter)
    );

    let (headers, rows) = io_utils::read_table(&args.input, delimiter, input_encoding, args.limit)?;
    let overrides = fields::collect_overrides(args.fieldmap.as_deref(), &args.map)?;
    let field_map = FieldMap::resolve(&headers, &overrides)?;
    if field_map.is_empty() {
        return Err(FieldMapError::NoRolesResolved.into());
    }

    let outcome = RecordPipeline::new(field_map).run(&headers, rows);

    if use_table_output {
        table::print_table(&outcome.headers, &outcome.rows);
    } else {
        let mut writer = io_utils::open_csv_writer(output_path, output_delimiter, output_encoding)?;
        writer
            .write_record(outcome.headers.iter())
            .context("Writing output headers")?;
        for row in &outcome.rows {
            writer
                .write_record(row.iter())
                .context("Writing output record")?;
        }
        writer.flush().context("Flushing output")?;
    }

    // The console report prints to stdout too; suppress it while cleaned
    // rows are streaming there as CSV.
    if !writing_to_stdout || use_table_output {
        outcome.report.render_console();
    }
    if let Some(report_path) = args.report.as_deref() {
        outcome.report.save_json(report_path)?;
        info!("Wrote cleaning report to {report_path:?}");
    }
    info!(
        "Cleaned {} row(s); {} flagged for verification, {} duplicate(s)",
        outcome.report.rows, outcome.report.needs_verification, outcome.report.duplicates.flagged
    );
    Ok(())
}
