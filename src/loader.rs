//! Single-archive and batch loading with per-archive failure isolation.
//!
//! A single-archive load either produces a [`Module`] or reports the failure
//! to the diagnostics sink and yields nothing - no per-archive error ever
//! crosses the loader boundary. Batch loads apply the single-archive loader
//! sequentially, so one broken archive never affects the others, and the
//! result preserves the order the archives were attempted in.

use std::path::{ Path, PathBuf };
use itertools::Itertools ;
use thiserror::Error ;

use crate::construct ;
use crate::construct::{ ConstructionFailure, ValueKind };
use crate::context ;
use crate::context::{ ArchiveError, LoadContext };
use crate::diagnostics::Severity ;
use crate::manifest ;
use crate::manifest::ManifestError ;
use crate::module::Module ;
use crate::report::ResultList ;
use crate::settings::Settings ;



/// The caller passed a file that is not a loadable archive.
///
/// Raised synchronously by the single-archive forms; batch forms silently
/// drop filtered-out files instead.
#[derive( Error, Debug )]
#[error( "the file {} is not a loadable archive", .file.display() )]
pub struct InvalidArgument {
	file: PathBuf,
}

impl InvalidArgument {

	pub(crate) fn new( file: &Path ) -> Self {
		Self { file: file.to_path_buf() }
	}

	/// The rejected path.
	#[inline] pub fn file( &self ) -> &Path { &self.file }

}

/// Why one archive failed to load.
///
/// Per-archive failures are reported through the diagnostics sink and never
/// raised past a load call; this type appears in caller-visible positions
/// only through [`Loader::load_report`].
#[derive( Error, Debug )]
pub enum LoadError {
	/// The archive could not be opened or its code entries compiled.
	#[error( "failed to open the archive: {0}" )]
	Archive( #[from] ArchiveError ),
	/// The descriptor entry is not present in the archive.
	#[error( "the descriptor entry '{0}' was not found" )]
	DescriptorMissing( String ),
	/// The descriptor entry exists but could not be parsed.
	#[error( "unreadable descriptor: {0}" )]
	DescriptorUnreadable( #[source] ManifestError ),
	/// The entry-point name doesn't resolve inside the archive.
	#[error( "no export named '{0}' exists in the archive" )]
	TypeNotFound( String ),
	/// The resolved export doesn't satisfy the expected contract.
	#[error( "the export '{export}' does not satisfy the contract '{contract}': missing {missing:?}" )]
	IncompatibleType {
		export: String,
		contract: String,
		missing: Vec<String>,
	},
	/// No constructor matches the declared signature.
	#[error( "no constructor '{function}' matches the signature {signature:?}" )]
	ConstructorNotFound {
		function: String,
		signature: Vec<ValueKind>,
	},
	/// Instantiation, the constructor call, or the initialiser failed.
	#[error( "construction failed: {0}" )]
	ConstructionFailed( #[source] ConstructionFailure ),
}

impl From<ManifestError> for LoadError {
	fn from( error: ManifestError ) -> Self {
		match error {
			ManifestError::Missing( entry ) => Self::DescriptorMissing( entry ),
			unreadable => Self::DescriptorUnreadable( unreadable ),
		}
	}
}

/// A configured loader: [`Settings`] plus the directory batch loads default to.
///
/// ```no_run
/// use wasm_load::{ Contract, Loader, Settings };
///
/// let settings = Settings::builder( Contract::new( "host:greeter", [ "greet" ])).build();
/// let loader = Loader::new( settings );
/// let modules = loader.load_all();
/// ```
#[derive( Debug )]
pub struct Loader {
	settings: Settings,
	directory: PathBuf,
}

impl Loader {

	/// Directory batch loads default to when none is configured.
	pub const DEFAULT_DIRECTORY: &'static str = "loadables" ;

	/// Creates a loader over the default directory.
	pub fn new( settings: Settings ) -> Self {
		Self::with_directory( settings, Self::DEFAULT_DIRECTORY )
	}

	/// Creates a loader over the given directory.
	pub fn with_directory( settings: Settings, directory: impl Into<PathBuf> ) -> Self {
		Self { settings, directory: directory.into() }
	}

	/// The configuration this loader applies to every call.
	#[inline] pub fn settings( &self ) -> &Settings { &self.settings }

	/// The directory [`Loader::load_all`] reads.
	#[inline] pub fn directory( &self ) -> &Path { &self.directory }

	/// Loads a single archive.
	///
	/// Returns `None` when the archive fails to load for any per-archive
	/// reason; the failure is reported to the diagnostics sink and never
	/// raised.
	///
	/// # Errors
	/// [`InvalidArgument`] when `file` doesn't pass the archive filter.
	pub fn load( &self, file: &Path ) -> Result<Option<Module>, InvalidArgument> {
		load( file, &self.settings )
	}

	/// Loads every archive in the configured directory.
	///
	/// The directory is created when absent, so a fresh installation starts
	/// with an empty (but existing) plugin directory and an empty result.
	pub fn load_all( &self ) -> Vec<Module> {
		if let Err( error ) = std::fs::create_dir_all( &self.directory ) {
			self.settings.diagnostics().report(
				Severity::Warning,
				&format!( "cannot create the plugin directory {}", self.directory.display() ),
				Some( &error ),
			);
			return Vec::new()
		}
		load_directory( &self.directory, &self.settings )
	}

	/// Loads every archive in an explicitly given directory.
	///
	/// An absent directory yields an empty result and is not created.
	pub fn load_all_in( &self, directory: &Path ) -> Vec<Module> {
		load_directory( directory, &self.settings )
	}

	/// Loads the given files in order, skipping files the filter rejects.
	pub fn load_files( &self, files: impl IntoIterator<Item = PathBuf> ) -> Vec<Module> {
		load_files( files, &self.settings )
	}

	/// Loads the given files in order, returning failures alongside the
	/// successes instead of reporting them to the diagnostics sink.
	pub fn load_report(
		&self,
		files: impl IntoIterator<Item = PathBuf>,
	) -> ResultList<Module, ( PathBuf, LoadError )> {
		files.into_iter()
			.filter(| file | self.settings.filter().accept( file ))
			.map(| file | attempt( &file, &self.settings ).map_err(| error | ( file, error )))
			.collect()
	}

}

/// Loads a single archive with the given settings.
///
/// Returns `None` when the archive fails to load; the failure is reported to
/// the settings' diagnostics sink and never raised.
///
/// # Errors
/// [`InvalidArgument`] when `file` doesn't pass the settings' archive filter.
pub fn load( file: &Path, settings: &Settings ) -> Result<Option<Module>, InvalidArgument> {

	if !settings.filter().accept( file ) {
		return Err( InvalidArgument::new( file ))
	}

	Ok( match attempt( file, settings ) {
		Ok( module ) => Some( module ),
		Err( error ) => {
			settings.diagnostics().report(
				Severity::Warning,
				&format!( "the archive {} failed to load", file.display() ),
				Some( &error ),
			);
			None
		}
	})

}

/// Loads every archive in a directory with the given settings.
///
/// An absent directory yields an empty result and is not created.
pub fn load_all( directory: &Path, settings: &Settings ) -> Vec<Module> {
	load_directory( directory, settings )
}

fn load_directory( directory: &Path, settings: &Settings ) -> Vec<Module> {
	let Ok( entries ) = std::fs::read_dir( directory ) else { return Vec::new() };
	let files = entries
		.filter_map( Result::ok )
		.map(| entry | entry.path() )
		.sorted();
	load_files( files, settings )
}

fn load_files( files: impl IntoIterator<Item = PathBuf>, settings: &Settings ) -> Vec<Module> {

	let ( modules, failures ): ( Vec<_>, Vec<_> ) = files.into_iter()
		.filter(| file | settings.filter().accept( file ))
		.map(| file | attempt( &file, settings ).map_err(| error | ( file, error )))
		.partition_result();

	for ( file, error ) in &failures {
		settings.diagnostics().report(
			Severity::Warning,
			&format!( "the archive {} failed to load", file.display() ),
			Some( error ),
		);
	}

	modules

}

/// One isolated load attempt: open, extract, compile, construct, initialise.
///
/// The archive bytes are read into memory up front, so the file handle is
/// released before any plugin code runs, on every exit path.
fn attempt( file: &Path, settings: &Settings ) -> Result<Module, LoadError> {

	let mut archive = context::open_archive( file )?;
	let manifest = manifest::extract( &mut archive, settings.descriptor() )?;
	let context = LoadContext::create( settings.engine(), archive )?;

	let instance = construct::construct(
		settings.engine(),
		&context,
		&manifest,
		settings.contract(),
		settings.construction(),
		settings.entry_key(),
	)?;

	let instance = settings.initialiser().initialise( instance, &manifest )
		.map_err(| error | LoadError::ConstructionFailed( ConstructionFailure::Initialiser( error )))?;

	Ok( Module::new( instance, context, file.to_path_buf() ))

}
