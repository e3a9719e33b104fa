//! Entry-point resolution and construction.
//!
//! Implements the construction pipeline for one archive: read the entry-point
//! name from the descriptor, resolve it inside the archive's context, check
//! it against the expected [`Contract`], locate a constructor matching the
//! declared signature, and invoke it with the produced arguments. The handle
//! returned on success is verified - callers may invoke any contract function
//! on it without further checks.

use std::sync::Arc ;
use thiserror::Error ;
use wasmtime::{ Engine, Store };
use wasmtime::component::{ Linker, Val };
use wasmtime::component::types::Type ;

use crate::context::LoadContext ;
use crate::contract::Contract ;
use crate::loader::LoadError ;
use crate::manifest::Manifest ;
use crate::plugin_instance::PluginInstance ;



/// Primitive component-model value kinds usable in constructor signatures.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum ValueKind {
	Bool,
	S8, U8, S16, U16, S32, U32, S64, U64,
	Float32, Float64,
	Char,
	String,
}

impl ValueKind {

	/// Returns `true` when a declared parameter of type `declared` accepts
	/// values of this kind.
	pub(crate) fn admits_type( self, declared: &Type ) -> bool {
		matches!(
			( self, declared ),
			( Self::Bool, Type::Bool )
			| ( Self::S8, Type::S8 ) | ( Self::U8, Type::U8 )
			| ( Self::S16, Type::S16 ) | ( Self::U16, Type::U16 )
			| ( Self::S32, Type::S32 ) | ( Self::U32, Type::U32 )
			| ( Self::S64, Type::S64 ) | ( Self::U64, Type::U64 )
			| ( Self::Float32, Type::Float32 ) | ( Self::Float64, Type::Float64 )
			| ( Self::Char, Type::Char )
			| ( Self::String, Type::String )
		)
	}

	/// Returns `true` when `value` is of this kind.
	pub(crate) fn admits_value( self, value: &Val ) -> bool {
		matches!(
			( self, value ),
			( Self::Bool, Val::Bool( _ ))
			| ( Self::S8, Val::S8( _ )) | ( Self::U8, Val::U8( _ ))
			| ( Self::S16, Val::S16( _ )) | ( Self::U16, Val::U16( _ ))
			| ( Self::S32, Val::S32( _ )) | ( Self::U32, Val::U32( _ ))
			| ( Self::S64, Val::S64( _ )) | ( Self::U64, Val::U64( _ ))
			| ( Self::Float32, Val::Float32( _ )) | ( Self::Float64, Val::Float64( _ ))
			| ( Self::Char, Val::Char( _ ))
			| ( Self::String, Val::String( _ ))
		)
	}

}

impl std::fmt::Display for ValueKind {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!( f, "{:?}", self )
	}
}

/// How to construct an entry-point export once it has been resolved.
///
/// Bundles the constructor function name, the declared parameter signature,
/// and a producer deriving the argument values from the archive's descriptor.
/// The default spec names `construct`, declares an empty signature, and
/// produces no arguments; an export without a constructor function then
/// constructs by instantiation alone.
///
/// ```
/// use wasm_load::{ ConstructionSpec, Val, ValueKind };
///
/// let spec = ConstructionSpec::new()
/// 	.with_signature([ ValueKind::U32 ])
/// 	.with_arguments(| manifest | vec![
/// 		Val::U32( manifest.value( "seed" ).parse().unwrap_or( 0 )),
/// 	]);
/// assert_eq!( spec.signature().len(), 1 );
/// ```
#[derive( Clone )]
pub struct ConstructionSpec {
	/// Constructor function name on the entry-point export
	constructor: String,
	/// Declared parameter types of the constructor
	signature: Vec<ValueKind>,
	/// Produces the argument values from the descriptor
	arguments: Arc<dyn Fn( &Manifest ) -> Vec<Val> + Send + Sync>,
}

impl ConstructionSpec {

	/// Default constructor function name.
	pub const DEFAULT_CONSTRUCTOR: &'static str = "construct" ;

	/// Creates the default spec: no-argument construction.
	pub fn new() -> Self {
		Self {
			constructor: Self::DEFAULT_CONSTRUCTOR.to_string(),
			signature: Vec::with_capacity( 0 ),
			arguments: Arc::new(| _ | Vec::with_capacity( 0 )),
		}
	}

	/// Sets the constructor function name. An empty name is normalised back
	/// to [`ConstructionSpec::DEFAULT_CONSTRUCTOR`].
	pub fn with_constructor( mut self, name: impl Into<String> ) -> Self {
		let name = name.into();
		self.constructor = match name.is_empty() {
			true => Self::DEFAULT_CONSTRUCTOR.to_string(),
			false => name,
		};
		self
	}

	/// Sets the declared parameter signature.
	pub fn with_signature( mut self, signature: impl IntoIterator<Item = ValueKind> ) -> Self {
		self.signature = signature.into_iter().collect();
		self
	}

	/// Sets the argument producer. The values it returns must match the
	/// declared signature at construction time, or construction fails.
	pub fn with_arguments( mut self, produce: impl Fn( &Manifest ) -> Vec<Val> + Send + Sync + 'static ) -> Self {
		self.arguments = Arc::new( produce );
		self
	}

	/// Constructor function name on the entry-point export.
	#[inline] pub fn constructor( &self ) -> &str { &self.constructor }

	/// Declared parameter types of the constructor.
	#[inline] pub fn signature( &self ) -> &[ValueKind] { &self.signature }

	/// Produces the argument values for `manifest`.
	pub(crate) fn arguments( &self, manifest: &Manifest ) -> Vec<Val> {
		( self.arguments )( manifest )
	}

}

impl Default for ConstructionSpec {
	fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for ConstructionSpec {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ConstructionSpec" )
			.field( "constructor", &self.constructor )
			.field( "signature", &self.signature )
			.field( "arguments", &"<closure>" )
			.finish()
	}
}

/// Causes of a failed construction attempt.
#[derive( Error, Debug )]
pub enum ConstructionFailure {
	/// The owning component could not be instantiated.
	#[error( "instantiation failed: {0}" )]
	Instantiation( wasmtime::Error ),
	/// The producer returned a different number of arguments than declared.
	#[error( "expected {expected} arguments, got {actual}" )]
	ArgumentCount { expected: usize, actual: usize },
	/// A produced argument does not match the declared parameter kind.
	#[error( "argument {index} is not a {expected} value" )]
	ArgumentMismatch { index: usize, expected: ValueKind },
	/// The constructor itself failed.
	#[error( "the constructor trapped: {0}" )]
	Invocation( wasmtime::Error ),
	/// The initialiser hook failed.
	#[error( "the initialiser failed: {0}" )]
	Initialiser( #[source] Box<dyn std::error::Error + Send + Sync> ),
}

/// Resolves and constructs the entry-point export of one archive.
pub(crate) fn construct(
	engine: &Engine,
	context: &LoadContext,
	manifest: &Manifest,
	contract: &Contract,
	spec: &ConstructionSpec,
	entry_key: &str,
) -> Result<PluginInstance, LoadError> {

	let entry_name = manifest.value( entry_key );
	let export = context.resolve( entry_name )
		.ok_or_else(|| LoadError::TypeNotFound( entry_name.to_string() ))?;

	let missing = contract.missing_functions( &export );
	if !missing.is_empty() {
		return Err( LoadError::IncompatibleType {
			export: entry_name.to_string(),
			contract: contract.name().to_string(),
			missing,
		})
	}

	let arguments = spec.arguments( manifest );

	let constructor = export.component.get_export_index( Some( &export.index ), spec.constructor() );
	if constructor.is_none() && !spec.signature().is_empty() {
		return Err( constructor_not_found( spec ))
	}

	let mut store = Store::new( engine, () );
	let linker = Linker::new( engine );
	let instance = linker.instantiate( &mut store, export.component )
		.map_err(| error | LoadError::ConstructionFailed( ConstructionFailure::Instantiation( error )))?;

	if let Some( constructor ) = constructor {
		let func = instance.get_func( &mut store, constructor )
			.ok_or_else(|| constructor_not_found( spec ))?;

		let func_ty = func.ty( &store );
		let declared: Vec<_> = func_ty.params().collect();
		let signature_matches = declared.len() == spec.signature().len()
			&& spec.signature().iter()
				.zip( declared.iter())
				.all(|( kind, ( _, declared ))| kind.admits_type( declared ));
		if !signature_matches {
			return Err( constructor_not_found( spec ))
		}

		check_arguments( spec, &arguments )?;

		let mut results = vec![ PluginInstance::PLACEHOLDER_VAL; func.ty( &store ).results().len() ];
		func.call( &mut store, &arguments, &mut results )
			.map_err(| error | LoadError::ConstructionFailed( ConstructionFailure::Invocation( error )))?;
		let _ = func.post_return( &mut store );
	}

	Ok( PluginInstance::new( store, instance, entry_name.to_string(), export.index ))

}

fn constructor_not_found( spec: &ConstructionSpec ) -> LoadError {
	LoadError::ConstructorNotFound {
		function: spec.constructor().to_string(),
		signature: spec.signature().to_vec(),
	}
}

fn check_arguments( spec: &ConstructionSpec, arguments: &[Val] ) -> Result<(), LoadError> {

	if arguments.len() != spec.signature().len() {
		return Err( LoadError::ConstructionFailed( ConstructionFailure::ArgumentCount {
			expected: spec.signature().len(),
			actual: arguments.len(),
		}))
	}

	match spec.signature().iter().zip( arguments ).position(|( kind, value )| !kind.admits_value( value )) {
		None => Ok(()),
		Some( index ) => Err( LoadError::ConstructionFailed( ConstructionFailure::ArgumentMismatch {
			index,
			expected: spec.signature()[ index ],
		})),
	}

}
