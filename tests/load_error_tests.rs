mod test_utils ;

use std::sync::Arc ;

use wasm_load::{
	Contract, ConstructionSpec, Initialiser, LoadError, Loader, Settings, Val, ValueKind,
};
use test_utils::{ write_archive, RecordingSink, COUNTER_WAT, GREETER_WAT, TRAP_WAT };

fn settings_with_sink( contract: Contract, sink: Arc<RecordingSink> ) -> Settings {
	Settings::builder( contract ).with_diagnostics( sink ).build()
}

fn greeter_contract() -> Contract {
	Contract::new( "my:package", [ "get-value" ])
}

/// Loads the archive through both failure-reporting forms: asserts the
/// warn-and-skip form yields nothing, then returns the failure recorded by
/// `load_report` for kind assertions.
fn failure_of( file: std::path::PathBuf, settings: &Settings ) -> LoadError {

	let loaded = wasm_load::load( &file, settings ).unwrap();
	assert!( loaded.is_none(), "the archive should fail to load" );

	let loader = Loader::with_directory( settings.clone(), file.parent().unwrap() );
	let report = loader.load_report( vec![ file ]);
	assert_eq!( report.successful().len(), 0 );
	let ( _, mut failures ) = report.deconstruct();
	assert_eq!( failures.len(), 1 );
	failures.pop().unwrap().1

}

#[test]
fn missing_descriptor_fails_and_warns_without_raising() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "no-descriptor.wasmod", &[
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	]);

	let sink = RecordingSink::new();
	let settings = settings_with_sink( greeter_contract(), sink.clone() );

	assert!( wasm_load::load( &file, &settings ).unwrap().is_none() );
	assert_eq!( sink.warnings(), 1 );
	assert!( sink.messages()[ 0 ].contains( "no-descriptor.wasmod" ));
	assert!( sink.causes()[ 0 ].contains( "module.properties" ));

}

#[test]
fn missing_descriptor_reports_as_descriptor_missing() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "no-descriptor.wasmod", &[
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( greeter_contract() ).build();
	let error = failure_of( file, &settings );
	assert!( matches!( error, LoadError::DescriptorMissing( entry ) if entry == "module.properties" ));

}

#[test]
fn unparsable_descriptor_reports_as_descriptor_unreadable() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "bad-descriptor.wasmod", &[
		( "module.properties", b"this line has no separator\n" ),
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( greeter_contract() ).build();
	assert!( matches!( failure_of( file, &settings ), LoadError::DescriptorUnreadable( _ )));

}

#[test]
fn unknown_entry_point_reports_as_type_not_found() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "wrong-entry.wasmod", &[
		( "module.properties", b"entry-point=no:such/export\n" ),
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( greeter_contract() ).build();
	let error = failure_of( file, &settings );
	assert!( matches!( error, LoadError::TypeNotFound( name ) if name == "no:such/export" ));

}

#[test]
fn absent_entry_point_key_never_resolves() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "no-key.wasmod", &[
		( "module.properties", b"unrelated=value\n" ),
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( greeter_contract() ).build();
	let error = failure_of( file, &settings );
	assert!( matches!( error, LoadError::TypeNotFound( name ) if name.is_empty() ));

}

#[test]
fn contract_violation_reports_as_incompatible_type() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "incompatible.wasmod", &[
		( "module.properties", b"entry-point=my:package/example\n" ),
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( Contract::new( "host:storage", [ "get-value", "store", "erase" ])).build();
	match failure_of( file, &settings ) {
		LoadError::IncompatibleType { contract, mut missing, .. } => {
			assert_eq!( contract, "host:storage" );
			missing.sort();
			assert_eq!( missing, vec![ "erase".to_string(), "store".to_string() ]);
		}
		other => panic!( "unexpected failure: {:?}", other ),
	}

}

#[test]
fn signature_mismatch_reports_as_constructor_not_found() {

	let directory = tempfile::tempdir().unwrap();
	// the counter's constructor takes one u32, not two
	let file = write_archive( directory.path(), "counter.wasmod", &[
		( "module.properties", b"entry-point=demo:plugin/counter\n" ),
		( "plugin.wat", COUNTER_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( Contract::new( "demo:plugin", [ "next" ]))
		.with_construction( ConstructionSpec::new()
			.with_signature([ ValueKind::U32, ValueKind::U32 ])
			.with_arguments(| _ | vec![ Val::U32( 0 ), Val::U32( 0 )]))
		.build();
	let error = failure_of( file, &settings );
	assert!( matches!( error, LoadError::ConstructorNotFound { function, .. } if function == "construct" ));

}

#[test]
fn missing_constructor_with_declared_signature_reports_as_constructor_not_found() {

	let directory = tempfile::tempdir().unwrap();
	// the greeter has no constructor at all
	let file = write_archive( directory.path(), "greeter.wasmod", &[
		( "module.properties", b"entry-point=my:package/example\n" ),
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( greeter_contract() )
		.with_construction( ConstructionSpec::new()
			.with_signature([ ValueKind::String ])
			.with_arguments(| _ | vec![ Val::String( "name".to_string() )]))
		.build();
	assert!( matches!( failure_of( file, &settings ), LoadError::ConstructorNotFound { .. } ));

}

#[test]
fn mismatched_argument_values_report_as_construction_failed() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "counter.wasmod", &[
		( "module.properties", b"entry-point=demo:plugin/counter\n" ),
		( "plugin.wat", COUNTER_WAT.as_bytes() ),
	]);

	// declared signature matches the constructor, but the producer emits a string
	let settings = Settings::builder( Contract::new( "demo:plugin", [ "next" ]))
		.with_construction( ConstructionSpec::new()
			.with_signature([ ValueKind::U32 ])
			.with_arguments(| _ | vec![ Val::String( "seven".to_string() )]))
		.build();
	assert!( matches!( failure_of( file, &settings ), LoadError::ConstructionFailed( _ )));

}

#[test]
fn trapping_constructor_reports_as_construction_failed() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "trap.wasmod", &[
		( "module.properties", b"entry-point=demo:plugin/trap\n" ),
		( "plugin.wat", TRAP_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( Contract::new( "demo:plugin", [] as [&str; 0] )).build();
	assert!( matches!( failure_of( file, &settings ), LoadError::ConstructionFailed( _ )));

}

#[test]
fn failing_initialiser_reports_as_construction_failed() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "greeter.wasmod", &[
		( "module.properties", b"entry-point=my:package/example\n" ),
		( "plugin.wat", GREETER_WAT.as_bytes() ),
	]);

	let settings = Settings::builder( greeter_contract() )
		.with_initialiser( Initialiser::new(| _, _ | Err( "refused by the host".into() )))
		.build();
	assert!( matches!( failure_of( file, &settings ), LoadError::ConstructionFailed( _ )));

}

#[test]
fn garbage_container_reports_as_archive_failure() {

	let directory = tempfile::tempdir().unwrap();
	let file = directory.path().join( "garbage.wasmod" );
	std::fs::write( &file, b"this is not a zip container" ).unwrap();

	let settings = Settings::builder( greeter_contract() ).build();
	assert!( matches!( failure_of( file, &settings ), LoadError::Archive( _ )));

}

#[test]
fn invalid_component_entry_reports_as_archive_failure() {

	let directory = tempfile::tempdir().unwrap();
	let file = write_archive( directory.path(), "bad-code.wasmod", &[
		( "module.properties", b"entry-point=my:package/example\n" ),
		( "plugin.wat", b"(component (this is not valid" ),
	]);

	let settings = Settings::builder( greeter_contract() ).build();
	assert!( matches!( failure_of( file, &settings ), LoadError::Archive( _ )));

}
