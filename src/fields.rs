//! Field-role resolution.
//!
//! The pipeline operates on eight well-known columns; everything else passes
//! through untouched. This module binds roles to column positions by matching
//! snake_cased header names, with per-role overrides from repeatable
//! `--map role=column` flags or a YAML mapping file.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use heck::ToSnakeCase;
use log::warn;
use thiserror::Error;

/// The columns the pipeline knows how to treat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    OrderDate,
    ShippingDate,
    ProductOrdered,
    ProductPrice,
    QuantityOrdered,
}

impl FieldRole {
    pub const ALL: [FieldRole; 8] = [
        FieldRole::CustomerName,
        FieldRole::CustomerEmail,
        FieldRole::CustomerPhone,
        FieldRole::OrderDate,
        FieldRole::ShippingDate,
        FieldRole::ProductOrdered,
        FieldRole::ProductPrice,
        FieldRole::QuantityOrdered,
    ];

    /// Default header name, also the role's spelling in flags and YAML.
    pub fn header(self) -> &'static str {
        match self {
            FieldRole::CustomerName => "customer_name",
            FieldRole::CustomerEmail => "customer_email",
            FieldRole::CustomerPhone => "customer_phone",
            FieldRole::OrderDate => "order_date",
            FieldRole::ShippingDate => "shipping_date",
            FieldRole::ProductOrdered => "product_ordered",
            FieldRole::ProductPrice => "product_price",
            FieldRole::QuantityOrdered => "quantity_ordered",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for FieldRole {
    type Err = FieldMapError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let normalized = token.trim().to_snake_case();
        FieldRole::ALL
            .into_iter()
            .find(|role| role.header() == normalized)
            .ok_or_else(|| FieldMapError::UnknownRole(token.trim().to_string()))
    }
}

#[derive(Debug, Error)]
pub enum FieldMapError {
    #[error(
        "unknown field role '{0}' (expected one of: customer_name, customer_email, \
         customer_phone, order_date, shipping_date, product_ordered, product_price, \
         quantity_ordered)"
    )]
    UnknownRole(String),
    #[error("mapping '{0}' is not of the form role=column")]
    MalformedMapping(String),
    #[error("column '{column}' mapped to role '{role}' does not exist in the header row")]
    MissingColumn { role: FieldRole, column: String },
    #[error("no recognizable field columns in the header row; use --map to bind them")]
    NoRolesResolved,
}

/// Role → column-index binding for one input file.
#[derive(Debug, Default)]
pub struct FieldMap {
    slots: HashMap<FieldRole, usize>,
}

impl FieldMap {
    /// Binds roles against a header row. Default bindings come from
    /// snake_cased header equality; `overrides` are applied afterwards in
    /// order, so later entries (CLI flags after file entries) win. Roles left
    /// unbound are logged once and skipped by the pipeline.
    pub fn resolve(
        headers: &[String],
        overrides: &[(FieldRole, String)],
    ) -> Result<Self, FieldMapError> {
        let mut slots = HashMap::new();
        for role in FieldRole::ALL {
            if let Some(idx) = headers
                .iter()
                .position(|header| normalize_header(header) == role.header())
            {
                slots.insert(role, idx);
            }
        }
        for (role, column) in overrides {
            let idx = find_column(headers, column).ok_or_else(|| FieldMapError::MissingColumn {
                role: *role,
                column: column.clone(),
            })?;
            slots.insert(*role, idx);
        }
        for role in FieldRole::ALL {
            if !slots.contains_key(&role) {
                warn!("No column found for '{role}'; that normalizer will be skipped");
            }
        }
        Ok(FieldMap { slots })
    }

    pub fn index_of(&self, role: FieldRole) -> Option<usize> {
        self.slots.get(&role).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bound roles in declaration order.
    pub fn bound_roles(&self) -> impl Iterator<Item = (FieldRole, usize)> + '_ {
        FieldRole::ALL
            .into_iter()
            .filter_map(|role| self.slots.get(&role).map(|idx| (role, *idx)))
    }
}

/// Parses one `role=column` flag value.
pub fn parse_mapping_flag(flag: &str) -> Result<(FieldRole, String), FieldMapError> {
    let (role, column) = flag
        .split_once('=')
        .ok_or_else(|| FieldMapError::MalformedMapping(flag.to_string()))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(FieldMapError::MalformedMapping(flag.to_string()));
    }
    Ok((role.parse()?, column.to_string()))
}

/// Loads `role: column` pairs from a YAML mapping file.
pub fn load_mapping_file(path: &Path) -> Result<Vec<(FieldRole, String)>> {
    let file = File::open(path).with_context(|| format!("Opening fieldmap file {path:?}"))?;
    let reader = BufReader::new(file);
    let entries: BTreeMap<String, String> =
        serde_yaml::from_reader(reader).context("Parsing fieldmap YAML")?;
    entries
        .into_iter()
        .map(|(role, column)| {
            let role = role.parse::<FieldRole>()?;
            Ok((role, column))
        })
        .collect()
}

/// Gathers overrides from the optional mapping file and the repeatable
/// `--map` flags, file entries first so the flags take precedence.
pub fn collect_overrides(
    mapping_file: Option<&Path>,
    flags: &[String],
) -> Result<Vec<(FieldRole, String)>> {
    let mut overrides = match mapping_file {
        Some(path) => load_mapping_file(path)?,
        None => Vec::new(),
    };
    for flag in flags {
        overrides.push(parse_mapping_flag(flag)?);
    }
    Ok(overrides)
}

fn normalize_header(header: &str) -> String {
    header.trim().to_snake_case()
}

fn find_column(headers: &[String], wanted: &str) -> Option<usize> {
    let target = wanted.trim();
    if let Some(idx) = headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(target))
    {
        return Some(idx);
    }
    let snake = target.to_snake_case();
    headers
        .iter()
        .position(|header| normalize_header(header) == snake)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|header| header.to_string()).collect()
    }

    #[test]
    fn resolves_header_spelling_variants() {
        let headers = headers(&["Customer Email", "CUSTOMER PHONE", "customer_name"]);
        let map = FieldMap::resolve(&headers, &[]).unwrap();
        assert_eq!(map.index_of(FieldRole::CustomerEmail), Some(0));
        assert_eq!(map.index_of(FieldRole::CustomerPhone), Some(1));
        assert_eq!(map.index_of(FieldRole::CustomerName), Some(2));
        assert_eq!(map.index_of(FieldRole::OrderDate), None);
    }

    #[test]
    fn overrides_beat_defaults() {
        let headers = headers(&["customer_email", "backup_email"]);
        let overrides = vec![(FieldRole::CustomerEmail, "backup_email".to_string())];
        let map = FieldMap::resolve(&headers, &overrides).unwrap();
        assert_eq!(map.index_of(FieldRole::CustomerEmail), Some(1));
    }

    #[test]
    fn override_column_must_exist() {
        let headers = headers(&["customer_email"]);
        let overrides = vec![(FieldRole::CustomerPhone, "cell".to_string())];
        let err = FieldMap::resolve(&headers, &overrides).unwrap_err();
        assert!(matches!(err, FieldMapError::MissingColumn { .. }));
    }

    #[test]
    fn mapping_flag_shapes() {
        let (role, column) = parse_mapping_flag("customer_phone=Cell Number").unwrap();
        assert_eq!(role, FieldRole::CustomerPhone);
        assert_eq!(column, "Cell Number");
        assert!(matches!(
            parse_mapping_flag("customer_phone"),
            Err(FieldMapError::MalformedMapping(_))
        ));
        assert!(matches!(
            parse_mapping_flag("shoe_size=7"),
            Err(FieldMapError::UnknownRole(_))
        ));
    }

    #[test]
    fn role_parsing_accepts_spelling_variants() {
        assert_eq!(
            "Order Date".parse::<FieldRole>().unwrap(),
            FieldRole::OrderDate
        );
        assert_eq!(
            "quantity_ordered".parse::<FieldRole>().unwrap(),
            FieldRole::QuantityOrdered
        );
    }

    #[test]
    fn bound_roles_iterate_in_declaration_order() {
        let headers = headers(&["quantity_ordered", "customer_name"]);
        let map = FieldMap::resolve(&headers, &[]).unwrap();
        let bound: Vec<FieldRole> = map.bound_roles().map(|(role, _)| role).collect();
        assert_eq!(
            bound,
            vec![FieldRole::CustomerName, FieldRole::QuantityOrdered]
        );
    }
}
