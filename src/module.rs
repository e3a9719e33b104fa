//! The result of a successful load.

use std::path::{ Path, PathBuf };

use crate::context::LoadContext ;
use crate::plugin_instance::PluginInstance ;



/// A successfully loaded plugin: the constructed instance, the context it
/// was resolved in, and the archive it came from.
///
/// A `Module` is a terminal handle - it exposes what was loaded but cannot
/// be reconfigured. Dropping it releases the instance and the context along
/// with every resource still reachable through them.
#[derive( Debug )]
pub struct Module {
	instance: PluginInstance,
	context: LoadContext,
	origin: PathBuf,
}

impl Module {

	pub(crate) fn new( instance: PluginInstance, context: LoadContext, origin: PathBuf ) -> Self {
		Self { instance, context, origin }
	}

	/// The constructed plugin instance.
	#[inline] pub fn get( &self ) -> &PluginInstance { &self.instance }

	/// The constructed plugin instance, mutably - required for
	/// [`PluginInstance::call`].
	#[inline] pub fn get_mut( &mut self ) -> &mut PluginInstance { &mut self.instance }

	/// The context the instance was resolved and constructed in.
	#[inline] pub fn context( &self ) -> &LoadContext { &self.context }

	/// Path of the archive this module was loaded from.
	#[inline] pub fn origin_file( &self ) -> &Path { &self.origin }

	/// Bytes of an embedded resource from the originating archive, or `None`
	/// when no such entry exists. Never fails.
	pub fn resource( &self, name: &str ) -> Option<Vec<u8>> {
		self.context.resource( name )
	}

	/// Consumes the module, releasing the instance to the caller.
	pub fn into_instance( self ) -> PluginInstance {
		self.instance
	}

}
