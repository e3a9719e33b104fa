#![allow( dead_code )]

use std::io::Write ;
use std::path::{ Path, PathBuf };
use std::sync::{ Arc, Mutex };

use wasm_load::{ DiagnosticsSink, Severity };

/// A component exporting `my:package/example` with a single `get-value`
/// function and no constructor.
pub const GREETER_WAT: &str = r#"(component
	(core module $m (func (export "f") (result i32) i32.const 42))
	(core instance $i (instantiate $m))
	(func $f (result u32) (canon lift (core func $i "f")))
	(instance $inst (export "get-value" (func $f)))
	(export "my:package/example" (instance $inst))
)"# ;

/// A component exporting `demo:plugin/counter` with a `construct( seed: u32 )`
/// constructor and a `next` function returning the incremented counter.
pub const COUNTER_WAT: &str = r#"(component
	(core module $m
		(global $value (mut i32) (i32.const 0))
		(func (export "construct") (param i32) (global.set $value (local.get 0)))
		(func (export "next") (result i32)
			(global.set $value (i32.add (global.get $value) (i32.const 1)))
			(global.get $value))
	)
	(core instance $i (instantiate $m))
	(func $construct (param "seed" u32) (canon lift (core func $i "construct")))
	(func $next (result u32) (canon lift (core func $i "next")))
	(instance $inst
		(export "construct" (func $construct))
		(export "next" (func $next)))
	(export "demo:plugin/counter" (instance $inst))
)"# ;

/// A component whose no-argument constructor traps immediately.
pub const TRAP_WAT: &str = r#"(component
	(core module $m (func (export "construct") unreachable))
	(core instance $i (instantiate $m))
	(func $construct (canon lift (core func $i "construct")))
	(instance $inst (export "construct" (func $construct)))
	(export "demo:plugin/trap" (instance $inst))
)"# ;

/// Writes a zip archive with the given entries into `directory`.
pub fn write_archive( directory: &Path, name: &str, entries: &[( &str, &[u8] )] ) -> PathBuf {
	let path = directory.join( name );
	let file = std::fs::File::create( &path ).expect( "fixture archive creation failed" );
	let mut archive = zip::ZipWriter::new( file );
	let options = zip::write::SimpleFileOptions::default();
	for ( entry, bytes ) in entries {
		archive.start_file( *entry, options ).expect( "fixture entry creation failed" );
		archive.write_all( bytes ).expect( "fixture entry write failed" );
	}
	archive.finish().expect( "fixture archive finish failed" );
	path
}

/// Writes a well-formed greeter archive named `name`.
pub fn write_greeter( directory: &Path, name: &str ) -> PathBuf {
	write_archive( directory, name, &[
		( "module.properties", b"entry-point=my:package/example\n" ),
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	])
}

/// A sink recording every report for later assertions.
#[derive( Default )]
pub struct RecordingSink {
	reports: Mutex<Vec<( Severity, String, Option<String> )>>,
}

impl RecordingSink {

	pub fn new() -> Arc<Self> {
		Arc::new( Self::default() )
	}

	pub fn warnings( &self ) -> usize {
		self.reports.lock().unwrap().iter()
			.filter(|( severity, _, _ )| *severity == Severity::Warning )
			.count()
	}

	pub fn messages( &self ) -> Vec<String> {
		self.reports.lock().unwrap().iter()
			.map(|( _, message, _ )| message.clone() )
			.collect()
	}

	pub fn causes( &self ) -> Vec<String> {
		self.reports.lock().unwrap().iter()
			.filter_map(|( _, _, cause )| cause.clone() )
			.collect()
	}

}

impl DiagnosticsSink for RecordingSink {
	fn report(
		&self,
		severity: Severity,
		message: &str,
		cause: Option<&( dyn std::error::Error + 'static )>,
	) {
		self.reports.lock().unwrap().push((
			severity,
			message.to_string(),
			cause.map( ToString::to_string ),
		));
	}
}
