//! Isolated per-archive load contexts.
//!
//! A [`LoadContext`] is the resolution namespace for exactly one archive:
//! every `*.wasm` / `*.wat` entry is compiled into a component and its
//! exports become resolvable by name, and every other entry is served as an
//! embedded resource. Two contexts never share resolution state - loading
//! the same archive twice produces two fully independent contexts.

use std::io::{ Cursor, Read } ;
use std::path::Path ;
use std::sync::Mutex ;
use thiserror::Error ;
use wasmtime::Engine ;
use wasmtime::component::{ Component, ComponentExportIndex } ;
use zip::ZipArchive ;



/// Errors raised while opening an archive or building its context.
#[derive( Error, Debug )]
pub enum ArchiveError {
	/// The archive file could not be read.
	#[error( "failed to read the archive: {0}" )]
	Io( #[from] std::io::Error ),
	/// The file is not a valid container.
	#[error( "not a loadable container: {0}" )]
	Container( #[from] zip::result::ZipError ),
	/// A code entry in the archive is not a valid component.
	#[error( "the entry '{0}' is not a valid component: {1}" )]
	Compile( String, wasmtime::Error ),
}

/// Reads an archive file fully into memory and opens it as a container.
///
/// Reading eagerly releases the OS file handle before any plugin code is
/// touched; resource lookups are later served from the in-memory copy.
pub(crate) fn open_archive( file: &Path ) -> Result<ZipArchive<Cursor<Vec<u8>>>, ArchiveError> {
	let bytes = std::fs::read( file )?;
	Ok( ZipArchive::new( Cursor::new( bytes ))? )
}

/// The isolated namespace built from one archive's contents.
///
/// Owns the compiled components of the archive and the archive bytes
/// themselves. A context belongs to the [`Module`]( crate::Module ) it
/// produced and lives exactly as long as it does.
pub struct LoadContext {
	/// Compiled code entries in archive order
	components: Vec<( String, Component )>,
	/// The open container, kept for resource lookups
	archive: Mutex<ZipArchive<Cursor<Vec<u8>>>>,
}

/// An export resolved inside a context, together with its owning component.
pub struct ExportHandle<'a> {
	pub(crate) component: &'a Component,
	pub(crate) index: ComponentExportIndex,
}

impl ExportHandle<'_> {

	/// The component the export was found in.
	#[inline] pub fn component( &self ) -> &Component { self.component }

	/// The export's index, usable with wasmtime's instance lookups.
	#[inline] pub fn index( &self ) -> ComponentExportIndex { self.index }

}

impl LoadContext {

	/// Compiles every code entry of the open archive into the context.
	///
	/// # Errors
	/// Fails when an entry cannot be read or is not a valid component; a
	/// context is only ever produced with all of its code entries compiled.
	pub(crate) fn create(
		engine: &Engine,
		mut archive: ZipArchive<Cursor<Vec<u8>>>,
	) -> Result<Self, ArchiveError> {

		let mut components = Vec::new();

		for index in 0..archive.len() {
			let ( name, bytes ) = {
				let mut entry = archive.by_index( index )?;
				let name = entry.name().to_string();
				if !Self::is_code_entry( &name ) { continue }
				let mut bytes = Vec::with_capacity( usize::try_from( entry.size() ).unwrap_or( 0 ));
				entry.read_to_end( &mut bytes )?;
				( name, bytes )
			};
			let component = Component::new( engine, &bytes )
				.map_err(| error | ArchiveError::Compile( name.clone(), error ))?;
			components.push(( name, component ));
		}

		Ok( Self { components, archive: Mutex::new( archive ) })

	}

	fn is_code_entry( name: &str ) -> bool {
		name.ends_with( ".wasm" ) || name.ends_with( ".wat" )
	}

	/// Resolves a named export against the archive's components.
	///
	/// Components are searched in archive order; the first component
	/// exporting `name` wins. The empty name never resolves.
	pub fn resolve( &self, name: &str ) -> Option<ExportHandle<'_>> {
		self.components.iter().find_map(|( _, component )|
			component.get_export_index( None, name )
				.map(| index | ExportHandle { component, index })
		)
	}

	/// Returns the bytes of the archive entry `name`, or `None` when the
	/// entry is absent or unreadable. Never fails.
	pub fn resource( &self, name: &str ) -> Option<Vec<u8>> {
		let mut archive = self.archive.lock().ok()?;
		let mut entry = archive.by_name( name ).ok()?;
		let mut bytes = Vec::with_capacity( usize::try_from( entry.size() ).unwrap_or( 0 ));
		entry.read_to_end( &mut bytes ).ok()?;
		Some( bytes )
	}

	/// Lists the names of all entries in the archive.
	pub fn entries( &self ) -> Vec<String> {
		match self.archive.lock() {
			Ok( archive ) => archive.file_names().map( str::to_string ).collect(),
			Err( _ ) => Vec::with_capacity( 0 ),
		}
	}

}

impl std::fmt::Debug for LoadContext {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "LoadContext" )
			.field( "components", &self.components.iter().map(|( name, _ )| name ).collect::<Vec<_>>() )
			.finish_non_exhaustive()
	}
}
