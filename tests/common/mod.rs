#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Per-test scratch directory, removed again when the test finishes.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Drops `contents` into a named file and hands back its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write fixture file");
        path
    }
}

/// A small messy export covering every recognized column.
pub fn messy_orders_csv() -> String {
    [
        "Customer Name,Customer Email,Customer Phone,Order Date,Shipping Date,Product Ordered,Product Price,Quantity Ordered",
        "  john SMITH ,John.Smith@gmal.com,(555) 123-4567,01/15/2022,2022-01-20,Widget,$19.99,2",
        "jane doe,jane@yaho.com ,555.987.6543,2022-01-15,pending,Gadget,12.5,three",
        ",missing@hotmal.com,,03/20/2022,,Widget,5,1",
    ]
    .join("\n")
}
