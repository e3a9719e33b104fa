//! A WebAssembly plugin loader for building modular applications.
//!
//! Plugins are shipped as **archives**: zip containers with the `.wasmod`
//! suffix holding a descriptor entry, one or more WASM components, and any
//! embedded resources the plugin wants to carry. `wasm_load` discovers such
//! archives, reads the descriptor to find the plugin's **entry point** (a
//! named instance export of one of its components), verifies the entry point
//! against an expected [`Contract`], constructs it, and hands back a
//! [`Module`] per successfully loaded archive. One broken archive never
//! aborts a batch - its failure is reported to a diagnostics sink and the
//! batch moves on.
//!
//! # Core Concepts
//!
//! - [`ArchiveFilter`]: Decides which files are load candidates. The base rule
//! 	(existing regular file with the `.wasmod` suffix) always applies; caller
//! 	predicates can only narrow it.
//!
//! - [`Manifest`]: The descriptor extracted from the archive's
//! 	`module.properties` entry - line-oriented `key=value` text. The
//! 	`entry-point` key names the export to instantiate.
//!
//! - [`LoadContext`]: An isolated namespace built from exactly one archive's
//! 	contents. Every code entry is compiled into it, every other entry is
//! 	served as a resource. Contexts are never shared across archives.
//!
//! - [`Contract`]: The capability an entry point must satisfy - the functions
//! 	the host intends to call. A resolved export is checked against the
//! 	contract before anything is constructed, so a loaded instance can be
//! 	called without further checks.
//!
//! - [`ConstructionSpec`]: How to construct the entry point - the constructor
//! 	function name, its declared parameter signature, and a producer deriving
//! 	the argument values from the descriptor.
//!
//! - [`Initialiser`]: An optional post-construction hook
//! 	`( instance, manifest ) -> instance`, identity by default.
//!
//! - [`Module`]: The result of one successful load - the constructed
//! 	[`PluginInstance`], its [`LoadContext`], and the origin path.
//!
//! # Re-exports
//!
//! `wasm_load` re-exports a small set of types from `wasmtime` for
//! convenience (`Engine`, `Component`, `Linker`, `Val`). These types are
//! defined by wasmtime; see the [wasmtime docs](https://docs.rs/wasmtime/latest/wasmtime/)
//! for details.
//!
//! # Example
//!
//! ```
//! use wasm_load::{ Contract, Loader, Settings, Val };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # use std::io::Write ;
//! # let directory = tempfile::tempdir()?;
//! # let file = std::fs::File::create( directory.path().join( "greeter.wasmod" ))?;
//! # let options = zip::write::SimpleFileOptions::default();
//! # let mut archive = zip::ZipWriter::new( file );
//! # archive.start_file( "module.properties", options )?;
//! # archive.write_all( b"entry-point=my:package/example\n" )?;
//! # archive.start_file( "plugin.wat", options )?;
//! # archive.write_all( br#"(component
//! # 	(core module $m (func (export "f") (result i32) i32.const 42))
//! # 	(core instance $i (instantiate $m))
//! # 	(func $f (result u32) (canon lift (core func $i "f")))
//! # 	(instance $inst (export "get-value" (func $f)))
//! # 	(export "my:package/example" (instance $inst))
//! # )"# )?;
//! # archive.finish()?;
//! // A directory holds archives like greeter.wasmod, packaged as a zip with
//! // a `module.properties` descriptor naming the entry point and a WASM
//! // component exporting it.
//! let settings = Settings::builder( Contract::new( "my:package", [ "get-value" ]))
//! 	.build();
//! let loader = Loader::with_directory( settings, directory.path() );
//!
//! // Archives that fail to load are reported and skipped, never raised.
//! let mut modules = loader.load_all();
//! assert_eq!( modules.len(), 1 );
//!
//! // The entry point satisfied the contract, so its functions may be called
//! // without further checks.
//! match modules[ 0 ].get_mut().call( "get-value", &[] )? {
//! 	Some( Val::U32( n )) => assert_eq!( n, 42 ),
//! 	other => panic!( "unexpected response: {:?}", other ),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Construction Arguments
//!
//! A plugin whose entry point exports a constructor function can be fed
//! arguments derived from its own descriptor. The declared signature is
//! checked against the constructor's actual parameters before anything is
//! invoked; archives whose constructor doesn't match are skipped.
//!
//! ```no_run
//! use wasm_load::{ Contract, ConstructionSpec, Loader, Settings, Val, ValueKind };
//!
//! let construction = ConstructionSpec::new()
//! 	.with_signature([ ValueKind::U32 ])
//! 	.with_arguments(| manifest | vec![
//! 		Val::U32( manifest.value( "seed" ).parse().unwrap_or( 0 )),
//! 	]);
//!
//! let settings = Settings::builder( Contract::new( "demo:plugin", [ "next" ]))
//! 	.with_construction( construction )
//! 	.build();
//! let modules = Loader::new( settings ).load_all();
//! ```

mod filter ;
mod manifest ;
mod context ;
mod contract ;
mod construct ;
mod plugin_instance ;
mod initialise ;
mod module ;
mod settings ;
mod loader ;
mod diagnostics ;
mod report ;

#[doc( no_inline )]
pub use wasmtime::Engine ;
#[doc( no_inline )]
pub use wasmtime::component::{ Component, Linker, Val };

pub use filter::{ ArchiveFilter, ARCHIVE_SUFFIX };
pub use manifest::{ Manifest, ManifestError, MalformedLine };
pub use context::{ LoadContext, ExportHandle, ArchiveError };
pub use contract::Contract ;
pub use construct::{ ConstructionSpec, ConstructionFailure, ValueKind };
pub use plugin_instance::{ PluginInstance, CallError };
pub use initialise::{ Initialiser, InitialiseError };
pub use module::Module ;
pub use settings::{ Settings, SettingsBuilder };
pub use loader::{ Loader, LoadError, InvalidArgument, load, load_all };
pub use diagnostics::{ DiagnosticsSink, Severity, TracingSink };
pub use report::ResultList ;
