//! Kiln Mangle - symbol names for ahead-of-time compiled code.
//!
//! Converts types, methods, fields, and string literals into unique,
//! linker-legal symbol names, and composes those into the platform-specific
//! symbols object writers need.
//!
//! # Architecture
//!
//! - [`NameMangler`]: base names with order-independent disambiguation.
//!   Whole batches of siblings (all types of a module, all methods or fields
//!   of a type) are named together in declaration order, so a name never
//!   depends on which entity the compiler happened to reach first.
//! - [`NodeMangler`] / [`SymbolNameStrategy`]: ELF/Mach-O vs. COFF shapes
//!   for vtables, statics, generic dictionaries, and decorated externs.
//! - [`SymbolNode`]: the graph nodes that request those names.
//! - [`TargetDetails`]: target triple parsing and strategy selection.
//!
//! # Usage
//!
//! ```text
//! let mut mangler = NameMangler::for_triple(&pool, "x86_64-unknown-linux-gnu")?;
//! mangler.set_compilation_unit_prefix("MyApp");
//!
//! let name = mangler.mangle_method(main);   // MyAsm_App_Program__Main
//! let vtable = mangler.node_mangler().method_table(program);
//! ```
//!
//! # Tracing
//!
//! Batch fills are instrumented at `debug` level. Enable with
//! `RUST_LOG=kiln_mangle=debug` after calling [`init_tracing`].

mod disambiguate;
mod error;
mod names;
mod node;
mod node_mangler;
mod sanitize;
mod stack;
mod target;

use std::sync::Once;

pub use error::MangleError;
pub use names::NameMangler;
pub use node::{
    ExternKind, ExternMethodTableSymbolNode, ExternSymbolNode, GenericDictionaryNode,
    MethodEntrypointNode, MethodTableNode, NativeLayoutSignatureNode, SignatureIdentity,
    StaticsNode, StringLiteralNode, SymbolNode, UnboxingStubNode,
};
pub use node_mangler::{NodeMangler, StaticsKind, SymbolNameStrategy};
pub use sanitize::{
    append_sanitized, append_sanitized_with_hash, is_sanitized, sanitize, sanitize_with_hash,
    MAX_HASHED_PREFIX_LEN,
};
pub use target::{TargetArch, TargetDetails, TargetError, TargetOs};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
