//! svgweld — build self-contained SVG documents from a library of
//! reusable, identifier-tagged fragments.
//!
//! Designers author SVG fragments (icons, symbols, gradients,
//! fonts-as-CSS) across many source files, referencing each other with
//! `href` attributes and `url(...)` values. svgweld resolves those
//! cross-file references and produces output documents where every
//! referenced definition is inlined into a `<defs>` block, so each
//! output renders correctly with no external fetches.
//!
//! # Architecture
//!
//! The pipeline is a sequential batch over the full source universe:
//!
//! 1. Every `*.svg` file under the source root is parsed into an owned
//!    element tree ([`xml`]).
//! 2. Each element becomes a [`resource::Resource`] with a
//!    deterministic structural identity; elements with an `id` get a
//!    globally unique output identifier and the attribute is rewritten
//!    on the spot ([`resource`]).
//! 3. `href`/`url(...)` references are extracted and canonicalized to
//!    absolute `(file, id)` coordinates ([`reference`]).
//! 4. Two graphs are built over all resources — containment and
//!    links — and their union is checked for cycles ([`graph`]).
//! 5. Reference attributes are rewritten to point at output
//!    identifiers, and identifier injectivity is verified globally
//!    ([`rewrite`]).
//! 6. For each requested file, the minimal set of external definition
//!    roots is computed and spliced into the document's `<defs>`
//!    ([`inline`]).
//! 7. Outputs are rendered in memory and written atomically, all or
//!    nothing ([`pipeline`]).
//!
//! # Example
//!
//! With `src/defs.svg` containing `<rect id="icon" …/>` and
//! `src/logo.svg` containing `<use href="defs.svg#icon"/>`:
//!
//! ```bash
//! svgweld build --src src --dest dist logo.svg
//! ```
//!
//! produces `dist/logo.svg` whose `<use>` points at a local fragment
//! and whose `<defs>` carries a copy of the rect under that same id —
//! no mention of `defs.svg` survives anywhere in the output.
//!
//! # Modules
//!
//! - [`cli`] — clap command-line interface (`build`, `validate`,
//!   `graph`)
//! - [`core`] — error taxonomy, user-facing error display, diagnostics
//! - [`manifest`] — optional `svgweld.toml` configuration
//! - [`xml`] — element tree, namespace-preserving attributes,
//!   pretty-printing writer
//! - [`resource`] — the resource arena and structural identity
//! - [`reference`] — reference extraction, canonicalization, policy
//! - [`graph`] — containment/link graphs, cycle detection,
//!   reachability
//! - [`rewrite`] — output-identity rewriting and injectivity checks
//! - [`inline`] — closure computation and `<defs>` splicing
//! - [`pipeline`] — batch orchestration
//! - [`utils`] — filesystem helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod graph;
pub mod inline;
pub mod manifest;
pub mod pipeline;
pub mod reference;
pub mod resource;
pub mod rewrite;
pub mod utils;
pub mod xml;
