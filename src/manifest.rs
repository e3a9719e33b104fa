//! Descriptor extraction and parsing.
//!
//! Every loadable archive embeds a descriptor entry (by convention
//! `module.properties`) of line-oriented `key=value` text. The descriptor
//! names the entry-point export to instantiate and may carry arbitrary
//! further keys for the construction arguments and the initialiser hook.

use std::collections::HashMap ;
use std::io::{ Cursor, Read } ;
use thiserror::Error ;
use zip::ZipArchive ;
use zip::result::ZipError ;



/// Key/value metadata extracted from an archive's descriptor entry.
///
/// Key order is irrelevant; later occurrences of a key overwrite earlier
/// ones. Lines that are blank or start with `#` or `!` are ignored.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct Manifest {
	values: HashMap<String, String>,
}

/// Errors raised while extracting a descriptor from an archive.
#[derive( Error, Debug )]
pub enum ManifestError {
	/// The named entry is not present in the archive.
	#[error( "the entry '{0}' was not found in the archive" )]
	Missing( String ),
	/// The entry exists but its content could not be read or parsed.
	#[error( "the entry '{0}' could not be read: {1}" )]
	Unreadable( String, #[source] Box<dyn std::error::Error + Send + Sync> ),
}

/// A descriptor line that is neither a comment nor a `key=value` pair.
#[derive( Error, Debug )]
#[error( "line {line} is not a 'key=value' pair" )]
pub struct MalformedLine {
	line: usize,
}

impl Manifest {

	/// Parses line-oriented `key=value` text.
	///
	/// Both `=` and `:` are accepted as separators, whichever appears first.
	///
	/// # Errors
	/// Returns [`MalformedLine`] for a non-comment line without a separator.
	pub fn parse( text: &str ) -> Result<Self, MalformedLine> {
		let mut values = HashMap::new();

		for ( index, raw ) in text.lines().enumerate() {
			let line = raw.trim();
			if line.is_empty() || line.starts_with( '#' ) || line.starts_with( '!' ) {
				continue
			}
			let separator = line.find([ '=', ':' ]).ok_or( MalformedLine { line: index + 1 })?;
			let ( key, value ) = line.split_at( separator );
			values.insert( key.trim_end().to_string(), value[ 1.. ].trim_start().to_string() );
		}

		Ok( Self { values })
	}

	/// Returns the value for `key`, if present.
	#[inline] pub fn get( &self, key: &str ) -> Option<&str> {
		self.values.get( key ).map( String::as_str )
	}

	/// Returns the value for `key`, or `""` when absent.
	///
	/// An absent entry-point key therefore reads as the empty name, which
	/// never resolves to an export.
	#[inline] pub fn value( &self, key: &str ) -> &str {
		self.get( key ).unwrap_or( "" )
	}

	/// Iterates over all key/value pairs.
	pub fn iter( &self ) -> impl Iterator<Item = ( &str, &str )> {
		self.values.iter().map(|( key, value )| ( key.as_str(), value.as_str() ))
	}

	/// Number of keys in the descriptor.
	#[inline] pub fn len( &self ) -> usize { self.values.len() }

	/// Returns `true` when the descriptor holds no keys.
	#[inline] pub fn is_empty( &self ) -> bool { self.values.is_empty() }

}

impl FromIterator<( String, String )> for Manifest {
	fn from_iter<T: IntoIterator<Item = ( String, String )>>( iter: T ) -> Self {
		Self { values: iter.into_iter().collect() }
	}
}

/// Extracts and parses the descriptor entry named `entry` from an open archive.
pub(crate) fn extract(
	archive: &mut ZipArchive<Cursor<Vec<u8>>>,
	entry: &str,
) -> Result<Manifest, ManifestError> {

	let mut descriptor = match archive.by_name( entry ) {
		Ok( descriptor ) => descriptor,
		Err( ZipError::FileNotFound ) => return Err( ManifestError::Missing( entry.to_string() )),
		Err( error ) => return Err( ManifestError::Unreadable( entry.to_string(), Box::new( error ))),
	};

	let mut text = String::new();
	descriptor.read_to_string( &mut text )
		.map_err(| error | ManifestError::Unreadable( entry.to_string(), Box::new( error )))?;

	Manifest::parse( &text )
		.map_err(| error | ManifestError::Unreadable( entry.to_string(), Box::new( error )))

}

#[cfg( test )]
mod tests {

	use super::Manifest ;

	#[test]
	fn parses_pairs_comments_and_blanks() {
		let manifest = Manifest::parse( "\
			# a comment\n\
			! another comment\n\
			\n\
			entry-point = demo:plugin/counter\n\
			seed: 7\n\
		" ).unwrap();
		assert_eq!( manifest.get( "entry-point" ), Some( "demo:plugin/counter" ));
		assert_eq!( manifest.get( "seed" ), Some( "7" ));
		assert_eq!( manifest.len(), 2 );
	}

	#[test]
	fn later_keys_overwrite_earlier_ones() {
		let manifest = Manifest::parse( "key=first\nkey=second\n" ).unwrap();
		assert_eq!( manifest.get( "key" ), Some( "second" ));
	}

	#[test]
	fn missing_key_reads_as_empty_value() {
		let manifest = Manifest::parse( "" ).unwrap();
		assert_eq!( manifest.get( "entry-point" ), None );
		assert_eq!( manifest.value( "entry-point" ), "" );
	}

	#[test]
	fn rejects_line_without_separator() {
		let error = Manifest::parse( "valid=pair\nnot a pair\n" ).unwrap_err();
		assert_eq!( error.to_string(), "line 2 is not a 'key=value' pair" );
	}

}
