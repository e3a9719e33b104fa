//! Post-construction initialisation hooks.

use std::sync::Arc ;

use crate::manifest::Manifest ;
use crate::plugin_instance::PluginInstance ;



/// Error type an initialiser hook may fail with.
pub type InitialiseError = Box<dyn std::error::Error + Send + Sync> ;

/// A hook applied to every freshly constructed instance before it is wrapped
/// into a [`Module`]( crate::Module ).
///
/// The hook receives the instance and the archive's descriptor and returns
/// the instance to keep - it may inspect, call into, or replace it. The
/// default hook is the identity. A failing hook fails the whole load attempt
/// for that archive.
///
/// ```
/// use wasm_load::Initialiser ;
///
/// let initialiser = Initialiser::new(| mut instance, manifest | {
/// 	if manifest.value( "warm-up" ) == "true" {
/// 		let _ = instance.call( "warm-up", &[] )?;
/// 	}
/// 	Ok( instance )
/// });
/// ```
#[derive( Clone )]
pub struct Initialiser(
	Arc<dyn Fn( PluginInstance, &Manifest ) -> Result<PluginInstance, InitialiseError> + Send + Sync>,
);

impl Initialiser {

	/// Creates an initialiser from a hook function.
	pub fn new(
		hook: impl Fn( PluginInstance, &Manifest ) -> Result<PluginInstance, InitialiseError> + Send + Sync + 'static,
	) -> Self {
		Self( Arc::new( hook ))
	}

	/// The identity initialiser: returns the instance unchanged.
	pub fn identity() -> Self {
		Self::new(| instance, _ | Ok( instance ))
	}

	/// Applies the hook to a freshly constructed instance.
	///
	/// # Errors
	/// Propagates whatever the hook fails with.
	pub fn initialise(
		&self,
		instance: PluginInstance,
		manifest: &Manifest,
	) -> Result<PluginInstance, InitialiseError> {
		( self.0 )( instance, manifest )
	}

}

impl Default for Initialiser {
	fn default() -> Self { Self::identity() }
}

impl std::fmt::Debug for Initialiser {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_tuple( "Initialiser" ).field( &"<hook>" ).finish()
	}
}
