//! Diagnostics reporting for per-archive failures.
//!
//! Loading never terminates a batch because one archive is broken; instead
//! each failure is reported through a [`DiagnosticsSink`] and the archive is
//! skipped. The default sink forwards to the `tracing` ecosystem.

use std::sync::Arc ;



/// Severity of a reported diagnostic.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Severity {
	Info,
	Warning,
	Error,
}

/// Receiver for load diagnostics.
///
/// The loader reports every per-archive failure exactly once, at
/// [`Severity::Warning`], with the archive identity in the message and the
/// failure as the cause.
pub trait DiagnosticsSink: Send + Sync {
	/// Reports one diagnostic.
	fn report(
		&self,
		severity: Severity,
		message: &str,
		cause: Option<&( dyn std::error::Error + 'static )>,
	);
}

/// The default sink: forwards diagnostics to `tracing` events.
#[derive( Debug, Default, Clone, Copy )]
pub struct TracingSink ;

impl DiagnosticsSink for TracingSink {
	fn report(
		&self,
		severity: Severity,
		message: &str,
		cause: Option<&( dyn std::error::Error + 'static )>,
	) {
		match ( severity, cause ) {
			( Severity::Info, None ) => tracing::info!( "{}", message ),
			( Severity::Info, Some( cause )) => tracing::info!( cause = %cause, "{}", message ),
			( Severity::Warning, None ) => tracing::warn!( "{}", message ),
			( Severity::Warning, Some( cause )) => tracing::warn!( cause = %cause, "{}", message ),
			( Severity::Error, None ) => tracing::error!( "{}", message ),
			( Severity::Error, Some( cause )) => tracing::error!( cause = %cause, "{}", message ),
		}
	}
}

/// The process-wide default sink used when a caller configures none.
pub(crate) fn default_sink() -> Arc<dyn DiagnosticsSink> {
	Arc::new( TracingSink )
}
