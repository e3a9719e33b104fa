use thiserror::Error ;
use wasmtime::component::{ ComponentExportIndex, Instance, Val };
use wasmtime::Store ;



/// A constructed plugin: its store, its instance, and its entry-point export.
///
/// Produced by a successful load and handed back wrapped in a
/// [`Module`]( crate::Module ). Every function required by the
/// [`Contract`]( crate::Contract ) the plugin was loaded against is
/// guaranteed to be callable through [`PluginInstance::call`].
pub struct PluginInstance {
	store: Store<()>,
	instance: Instance,
	export: String,
	export_index: ComponentExportIndex,
}

impl std::fmt::Debug for PluginInstance {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::result::Result<(), std::fmt::Error> {
		f.debug_struct( "PluginInstance" )
			.field( "export", &self.export )
			.finish_non_exhaustive()
	}
}

/// Errors that can occur when calling into a loaded plugin.
#[derive( Error, Debug )]
pub enum CallError {
	/// The named function doesn't exist on the entry-point export.
	#[error( "Invalid Function: {0}" )] InvalidFunction( String ),
	/// The provided arguments don't match the function signature.
	#[error( "Invalid Argument List" )] InvalidArgumentList,
	/// The plugin function trapped during execution.
	#[error( "Runtime Exception: {0}" )] RuntimeException( wasmtime::Error ),
}

impl PluginInstance {

	pub(crate) const PLACEHOLDER_VAL: Val = Val::Tuple( vec![] );

	pub(crate) fn new(
		store: Store<()>,
		instance: Instance,
		export: String,
		export_index: ComponentExportIndex,
	) -> Self {
		Self { store, instance, export, export_index }
	}

	/// Name of the entry-point export this instance was constructed from.
	#[inline] pub fn export( &self ) -> &str { &self.export }

	/// Calls a function on the entry-point export.
	///
	/// Returns the function's result value, or `None` for void functions.
	///
	/// # Errors
	/// Fails when the function doesn't exist, the argument count doesn't
	/// match the declared parameters, or the call traps.
	pub fn call( &mut self, function: &str, arguments: &[Val] ) -> Result<Option<Val>, CallError> {

		let func_index = self.instance
			.get_export_index( &mut self.store, Some( &self.export_index ), function )
			.ok_or_else(|| CallError::InvalidFunction( format!( "{}:{}", self.export, function )))?;
		let func = self.instance
			.get_func( &mut self.store, func_index )
			.ok_or_else(|| CallError::InvalidFunction( format!( "{}:{}", self.export, function )))?;

		if func.ty( &self.store ).params().len() != arguments.len() {
			return Err( CallError::InvalidArgumentList )
		}

		let mut buffer = vec![ Self::PLACEHOLDER_VAL; func.ty( &self.store ).results().len() ];
		let call_result = func.call( &mut self.store, arguments, &mut buffer );

		call_result.map_err( CallError::RuntimeException )?;
		let _ = func.post_return( &mut self.store );

		Ok( buffer.pop() )

	}

}
