//! Reusable load configuration.

use std::sync::Arc ;
use wasmtime::Engine ;

use crate::construct::ConstructionSpec ;
use crate::contract::Contract ;
use crate::diagnostics::{ default_sink, DiagnosticsSink };
use crate::filter::ArchiveFilter ;
use crate::initialise::Initialiser ;



/// Immutable bundle of everything a load call needs besides the archive
/// itself: the engine, the expected [`Contract`], the archive filter, the
/// descriptor conventions, the [`ConstructionSpec`], the [`Initialiser`],
/// and the diagnostics sink.
///
/// `Settings` is cheap to clone and safe to share; one configured value can
/// drive any number of load calls.
///
/// ```
/// use wasm_load::{ Contract, Settings };
///
/// let settings = Settings::builder( Contract::new( "host:greeter", [ "greet" ]))
/// 	.with_descriptor( "plugin.properties" )
/// 	.build();
/// assert_eq!( settings.descriptor(), "plugin.properties" );
/// ```
#[derive( Clone )]
pub struct Settings {
	engine: Engine,
	contract: Contract,
	filter: ArchiveFilter,
	descriptor: String,
	entry_key: String,
	construction: ConstructionSpec,
	initialiser: Initialiser,
	diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Settings {

	/// Default descriptor entry name inside an archive.
	pub const DESCRIPTOR_ENTRY: &'static str = "module.properties" ;
	/// Default descriptor key naming the entry-point export.
	pub const ENTRY_POINT_KEY: &'static str = "entry-point" ;

	/// Starts building settings for the given expected contract.
	///
	/// The contract is the one required input; everything else has a
	/// documented default.
	pub fn builder( contract: Contract ) -> SettingsBuilder {
		SettingsBuilder {
			engine: None,
			contract,
			filter: ArchiveFilter::new(),
			descriptor: Self::DESCRIPTOR_ENTRY.to_string(),
			entry_key: Self::ENTRY_POINT_KEY.to_string(),
			construction: ConstructionSpec::new(),
			initialiser: Initialiser::identity(),
			diagnostics: default_sink(),
		}
	}

	/// The engine archives are compiled and instantiated with.
	#[inline] pub fn engine( &self ) -> &Engine { &self.engine }

	/// The capability every loaded entry point must satisfy.
	#[inline] pub fn contract( &self ) -> &Contract { &self.contract }

	/// The archive filter applied before any load attempt.
	#[inline] pub fn filter( &self ) -> &ArchiveFilter { &self.filter }

	/// Name of the descriptor entry inside an archive.
	#[inline] pub fn descriptor( &self ) -> &str { &self.descriptor }

	/// Descriptor key naming the entry-point export.
	#[inline] pub fn entry_key( &self ) -> &str { &self.entry_key }

	/// How entry points are constructed.
	#[inline] pub fn construction( &self ) -> &ConstructionSpec { &self.construction }

	/// The post-construction hook.
	#[inline] pub fn initialiser( &self ) -> &Initialiser { &self.initialiser }

	/// The sink per-archive failures are reported to.
	#[inline] pub fn diagnostics( &self ) -> &dyn DiagnosticsSink { self.diagnostics.as_ref() }

}

impl std::fmt::Debug for Settings {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Settings" )
			.field( "contract", &self.contract )
			.field( "filter", &self.filter )
			.field( "descriptor", &self.descriptor )
			.field( "entry_key", &self.entry_key )
			.field( "construction", &self.construction )
			.field( "initialiser", &self.initialiser )
			.finish_non_exhaustive()
	}
}

impl std::fmt::Debug for SettingsBuilder {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "SettingsBuilder" )
			.field( "contract", &self.contract )
			.field( "descriptor", &self.descriptor )
			.field( "entry_key", &self.entry_key )
			.field( "construction", &self.construction )
			.finish_non_exhaustive()
	}
}

/// Builder for [`Settings`].
///
/// Setters replace defaults; string setters normalise empty input back to
/// the default instead of accepting a value that could never match anything.
#[must_use = "call .build() to obtain Settings"]
pub struct SettingsBuilder {
	engine: Option<Engine>,
	contract: Contract,
	filter: ArchiveFilter,
	descriptor: String,
	entry_key: String,
	construction: ConstructionSpec,
	initialiser: Initialiser,
	diagnostics: Arc<dyn DiagnosticsSink>,
}

impl SettingsBuilder {

	/// Sets the engine. Defaults to `Engine::default()` at build time.
	pub fn with_engine( mut self, engine: Engine ) -> Self {
		self.engine = Some( engine );
		self
	}

	/// Sets the archive filter.
	pub fn with_filter( mut self, filter: ArchiveFilter ) -> Self {
		self.filter = filter ;
		self
	}

	/// Sets the descriptor entry name. An empty name is normalised back to
	/// [`Settings::DESCRIPTOR_ENTRY`].
	pub fn with_descriptor( mut self, entry: impl Into<String> ) -> Self {
		let entry = entry.into();
		self.descriptor = match entry.is_empty() {
			true => Settings::DESCRIPTOR_ENTRY.to_string(),
			false => entry,
		};
		self
	}

	/// Sets the descriptor key naming the entry-point export. An empty key
	/// is normalised back to [`Settings::ENTRY_POINT_KEY`].
	pub fn with_entry_key( mut self, key: impl Into<String> ) -> Self {
		let key = key.into();
		self.entry_key = match key.is_empty() {
			true => Settings::ENTRY_POINT_KEY.to_string(),
			false => key,
		};
		self
	}

	/// Sets the construction spec.
	pub fn with_construction( mut self, construction: ConstructionSpec ) -> Self {
		self.construction = construction ;
		self
	}

	/// Sets the post-construction hook.
	pub fn with_initialiser( mut self, initialiser: Initialiser ) -> Self {
		self.initialiser = initialiser ;
		self
	}

	/// Sets the diagnostics sink.
	pub fn with_diagnostics( mut self, sink: Arc<dyn DiagnosticsSink> ) -> Self {
		self.diagnostics = sink ;
		self
	}

	/// Finishes the build. Cannot fail: the expected contract was already
	/// supplied to [`Settings::builder`] and every other field has a default.
	pub fn build( self ) -> Settings {
		Settings {
			engine: self.engine.unwrap_or_default(),
			contract: self.contract,
			filter: self.filter,
			descriptor: self.descriptor,
			entry_key: self.entry_key,
			construction: self.construction,
			initialiser: self.initialiser,
			diagnostics: self.diagnostics,
		}
	}

}

#[cfg( test )]
mod tests {

	use super::Settings ;
	use crate::contract::Contract ;

	#[test]
	fn empty_string_setters_normalise_to_defaults() {
		let settings = Settings::builder( Contract::new( "host:plugin", [ "run" ]))
			.with_descriptor( "" )
			.with_entry_key( "" )
			.build();
		assert_eq!( settings.descriptor(), Settings::DESCRIPTOR_ENTRY );
		assert_eq!( settings.entry_key(), Settings::ENTRY_POINT_KEY );
	}

	#[test]
	fn defaults_are_the_documented_conventions() {
		let settings = Settings::builder( Contract::new( "host:plugin", [ "run" ])).build();
		assert_eq!( settings.descriptor(), "module.properties" );
		assert_eq!( settings.entry_key(), "entry-point" );
		assert!( settings.construction().signature().is_empty() );
		assert_eq!( settings.contract().name(), "host:plugin" );
	}

}
