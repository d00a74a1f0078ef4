//! File plumbing for delimited data: delimiter and encoding resolution,
//! table materialization, and transcoded CSV output.
//!
//! Readers are flexible about record width since ragged rows are exactly the
//! kind of mess this tool is fed; the pipeline squares them to the header
//! width afterwards. Output always quotes, so a cleaned file re-reads without
//! loss, and the `-` path convention routes through the standard streams.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

/// Looks `label` up in the WHATWG encoding registry; `None` means UTF-8.
pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

fn delimiter_for_extension(path: &Path) -> Option<u8> {
    let ext = path.extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("tsv") {
        Some(b'\t')
    } else if ext.eq_ignore_ascii_case("csv") {
        Some(b',')
    } else {
        None
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided
        .or_else(|| delimiter_for_extension(path))
        .unwrap_or(b',')
}

/// Output delimiter: explicit flag first, then the output extension, then
/// whatever the input used.
pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    provided
        .or_else(|| path.and_then(delimiter_for_extension))
        .unwrap_or(fallback)
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    Ok(if is_dash(path) {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
        Box::new(BufReader::new(file))
    })
}

/// Materializes a whole delimited file: decoded header row plus data rows.
/// `limit`, when given, caps the number of data rows read.
pub fn read_table(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    limit: Option<usize>,
) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(open_input(path)?);

    let header_record = reader.byte_headers().context("Reading header row")?.clone();
    let headers = decode_record(&header_record, encoding)?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        if let Some(limit) = limit
            && row_idx >= limit
        {
            break;
        }
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        rows.push(decode_record(&record, encoding)?);
    }
    Ok((headers, rows))
}

fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| {
            let (text, _, had_errors) = encoding.decode(field);
            if had_errors {
                Err(anyhow!("Input is not valid {}", encoding.name()))
            } else {
                Ok(text.into_owned())
            }
        })
        .collect()
}

/// CSV writer to `path` (stdout when `None` or `-`), quoting every field and
/// transcoding when the target encoding is not UTF-8.
pub fn open_csv_writer(
    path: Option<&Path>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => {
            let file = File::create(p).with_context(|| format!("Creating output file {p:?}"))?;
            Box::new(BufWriter::new(file))
        }
        _ => Box::new(io::stdout()),
    };
    let sink: Box<dyn Write> = if encoding == UTF_8 {
        sink
    } else {
        Box::new(TranscodingWriter::new(sink, encoding))
    };
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Always)
        .double_quote(true)
        .from_writer(sink))
}

/// Buffers writes until they form complete UTF-8, then re-encodes them into
/// the target encoding.
struct TranscodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    pending: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            pending: Vec::new(),
        }
    }

    fn drain_ready(&mut self, finishing: bool) -> io::Result<()> {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    let text = text.to_owned();
                    self.encode_to_inner(&text)?;
                    self.pending.clear();
                    return Ok(());
                }
                Err(err) if err.error_len().is_some() => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "Invalid UTF-8 sequence in output stream",
                    ));
                }
                Err(err) => {
                    // The tail is an incomplete multi-byte sequence. Write
                    // the valid prefix and keep the tail for the next write.
                    let ready = err.valid_up_to();
                    if ready == 0 {
                        if finishing {
                            return Err(io::Error::new(
                                io::ErrorKind::InvalidData,
                                "Incomplete UTF-8 sequence at end of output stream",
                            ));
                        }
                        return Ok(());
                    }
                    let text = String::from_utf8(self.pending[..ready].to_vec())
                        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
                    self.encode_to_inner(&text)?;
                    self.pending.drain(..ready);
                }
            }
        }
    }

    fn encode_to_inner(&mut self, text: &str) -> io::Result<()> {
        let (encoded, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to encode text using {}", self.encoding.name()),
            ));
        }
        self.inner.write_all(encoded.as_ref())
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_ready(false)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_ready(true)?;
        self.inner.flush()
    }
}
