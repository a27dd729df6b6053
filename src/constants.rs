//! Global constants used throughout the svgweld codebase.

/// XML declaration version written at the top of every output file.
pub const XML_VERSION: &str = "1.0";

/// Output text encoding, declared and used verbatim.
pub const XML_ENCODING: &str = "utf-8";

/// Indentation width for pretty-printed output documents.
pub const INDENT_WIDTH: usize = 2;

/// Number of identity digest characters appended to an original `id`
/// when forming an output identifier. Twelve hex characters keep the
/// ids readable while making accidental collisions implausible; actual
/// collisions are still verified and rejected at build time.
pub const OUTPUT_ID_HASH_LEN: usize = 12;

/// Default manifest file name, looked up in the working directory.
pub const MANIFEST_FILE: &str = "svgweld.toml";

/// Source file extension (matched case-insensitively) loaded from the
/// source tree; everything else is ignored.
pub const SVG_EXTENSION: &str = "svg";
