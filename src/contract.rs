//! Capability contracts for loaded plugins.
//!
//! A [`Contract`] is the statically-known interface an entry-point export
//! must satisfy before it may be constructed: a package-style name used in
//! diagnostics, plus the functions the export has to provide. Resolution
//! produces an unverified handle; the contract check is what turns it into
//! something the host may call without further checks.

use crate::context::ExportHandle ;



/// The expected capability of a loaded plugin.
///
/// ```
/// use wasm_load::Contract ;
///
/// let contract = Contract::new( "host:greeter", [ "greet", "farewell" ]);
/// assert_eq!( contract.functions().len(), 2 );
/// ```
#[derive( Debug, Clone )]
pub struct Contract {
	/// Contract name used in diagnostics (e.g. "host:greeter")
	name: String,
	/// Functions the entry-point export must provide
	functions: Vec<String>,
}

impl Contract {

	/// Creates a contract requiring the given functions.
	///
	/// An empty function list accepts any resolvable export.
	pub fn new(
		name: impl Into<String>,
		functions: impl IntoIterator<Item = impl Into<String>>,
	) -> Self {
		Self {
			name: name.into(),
			functions: functions.into_iter().map( Into::into ).collect(),
		}
	}

	/// Contract name used in diagnostics.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Functions the entry-point export must provide.
	#[inline] pub fn functions( &self ) -> &[String] { &self.functions }

	/// Returns the required functions the resolved export does not provide.
	pub(crate) fn missing_functions( &self, export: &ExportHandle<'_> ) -> Vec<String> {
		self.functions.iter()
			.filter(| function | export.component.get_export_index( Some( &export.index ), function.as_str() ).is_none() )
			.cloned()
			.collect()
	}

}
