//! Archive filtering.
//!
//! Decides which files are candidates for loading at all. The base rule is
//! fixed: the path must name an existing regular file with the recognised
//! archive suffix. A caller-supplied predicate can narrow acceptance further
//! but can never widen it past the base rule.

use std::path::Path ;
use std::sync::Arc ;

/// File-name suffix of a loadable plugin archive.
pub const ARCHIVE_SUFFIX: &str = "wasmod" ;

/// Predicate over candidate archive files.
///
/// The default filter applies the base rule only. [`ArchiveFilter::with`]
/// attaches an additional predicate that is ANDed with the base rule, so a
/// custom filter can only reject more files, never accept files the base
/// rule rejects.
///
/// ```
/// use wasm_load::ArchiveFilter ;
///
/// let filter = ArchiveFilter::with(| file | !file.ends_with( "legacy.wasmod" ));
/// assert!( !filter.accept( std::path::Path::new( "no-such-file.wasmod" )));
/// ```
#[derive( Clone, Default )]
pub struct ArchiveFilter {
	predicate: Option<Arc<dyn Fn( &Path ) -> bool + Send + Sync>>,
}

impl ArchiveFilter {

	/// Creates a filter applying the base rule only.
	pub fn new() -> Self {
		Self { predicate: None }
	}

	/// Creates a filter combining the base rule with an additional predicate.
	///
	/// The predicate only sees files that already pass the base rule.
	pub fn with( predicate: impl Fn( &Path ) -> bool + Send + Sync + 'static ) -> Self {
		Self { predicate: Some( Arc::new( predicate )) }
	}

	/// Returns `true` when `file` is an existing regular file with the
	/// recognised suffix and the additional predicate (if any) accepts it.
	pub fn accept( &self, file: &Path ) -> bool {
		Self::base( file ) && match &self.predicate {
			None => true,
			Some( predicate ) => predicate( file ),
		}
	}

	fn base( file: &Path ) -> bool {
		file.is_file() && file.extension().map_or( false, | extension | extension == ARCHIVE_SUFFIX )
	}

}

impl std::fmt::Debug for ArchiveFilter {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ArchiveFilter" )
			.field( "predicate", &self.predicate.as_ref().map(| _ | "<closure>" ))
			.finish()
	}
}

#[cfg( test )]
mod tests {

	use super::ArchiveFilter ;
	use std::io::Write ;

	#[test]
	fn rejects_wrong_suffix_before_any_io() {
		let directory = tempfile::tempdir().unwrap();
		let file = directory.path().join( "broken.txt" );
		std::fs::File::create( &file ).unwrap().write_all( b"not an archive" ).unwrap();
		assert!( !ArchiveFilter::new().accept( &file ));
	}

	#[test]
	fn rejects_missing_file_with_right_suffix() {
		let directory = tempfile::tempdir().unwrap();
		assert!( !ArchiveFilter::new().accept( &directory.path().join( "absent.wasmod" )));
	}

	#[test]
	fn rejects_directory_with_right_suffix() {
		let directory = tempfile::tempdir().unwrap();
		let path = directory.path().join( "dir.wasmod" );
		std::fs::create_dir( &path ).unwrap();
		assert!( !ArchiveFilter::new().accept( &path ));
	}

	#[test]
	fn accepts_existing_regular_file_with_right_suffix() {
		let directory = tempfile::tempdir().unwrap();
		let file = directory.path().join( "plugin.wasmod" );
		std::fs::File::create( &file ).unwrap();
		assert!( ArchiveFilter::new().accept( &file ));
	}

	#[test]
	fn custom_predicate_narrows_but_never_widens() {
		let directory = tempfile::tempdir().unwrap();
		let accepted = directory.path().join( "keep.wasmod" );
		let rejected = directory.path().join( "skip.wasmod" );
		let wrong_suffix = directory.path().join( "keep.txt" );
		for file in [ &accepted, &rejected, &wrong_suffix ] {
			std::fs::File::create( file ).unwrap();
		}

		let filter = ArchiveFilter::with(| file | {
			file.file_name().map_or( false, | name | name.to_string_lossy().starts_with( "keep" ))
		});
		assert!( filter.accept( &accepted ));
		assert!( !filter.accept( &rejected ));
		// the predicate matches, but the base rule still rejects
		assert!( !filter.accept( &wrong_suffix ));
	}

}
