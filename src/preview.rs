//! The `preview` command: a quick look at a raw export before cleaning it.

use anyhow::Result;
use itertools::Itertools;
use log::info;

use crate::fields::FieldMap;
use crate::{cli::PreviewArgs, io_utils, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let (headers, rows) =
        io_utils::read_table(&args.input, delimiter, encoding, Some(args.rows))?;

    table::print_table(&headers, &rows);
    info!("Displayed {} row(s) from {:?}", rows.len(), args.input);

    // Surface what a clean run would bind, so header surprises show up here
    // rather than halfway through a run.
    let field_map = FieldMap::resolve(&headers, &[])?;
    if field_map.is_empty() {
        info!("No field roles auto-resolve; a clean run would need --map bindings");
    } else {
        let bound = field_map
            .bound_roles()
            .map(|(role, _)| role.header())
            .join(", ");
        info!("Auto-resolved field roles: {bound}");
    }
    Ok(())
}
