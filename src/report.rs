//! Partial-success reporting for batch loads.

/// Outcome of a batch operation where individual items may fail without
/// failing the batch: the successes and the failures, side by side.
///
/// Both lists preserve the order the items were attempted in.
#[derive( Debug )]
pub struct ResultList<S, E> {
	successful: Vec<S>,
	failed: Vec<E>,
}

impl<S, E> ResultList<S, E> {

	/// Creates an empty list.
	pub fn new() -> Self {
		Self { successful: Vec::new(), failed: Vec::new() }
	}

	/// The items that succeeded, in attempt order.
	#[inline] pub fn successful( &self ) -> &[S] { &self.successful }

	/// The failures, in attempt order.
	#[inline] pub fn failed( &self ) -> &[E] { &self.failed }

	/// Returns `true` when no item failed.
	#[inline] pub fn is_complete( &self ) -> bool { self.failed.is_empty() }

	/// Splits the list into its success and failure vectors.
	pub fn deconstruct( self ) -> ( Vec<S>, Vec<E> ) {( self.successful, self.failed )}

	/// Consumes the list, keeping only the successes.
	pub fn into_successful( self ) -> Vec<S> { self.successful }

}

impl<S, E> Default for ResultList<S, E> {
	fn default() -> Self { Self::new() }
}

impl<S, E> FromIterator<Result<S, E>> for ResultList<S, E> {
	fn from_iter<T: IntoIterator<Item = Result<S, E>>>( iter: T ) -> Self {
		iter.into_iter().fold( ResultList::new(), | mut list, item | {
			match item {
				Ok( success ) => list.successful.push( success ),
				Err( failure ) => list.failed.push( failure ),
			}
			list
		})
	}
}
