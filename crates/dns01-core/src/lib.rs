// # dns01-core
//
// Core library for solving ACME DNS-01 challenges with provider-hosted TXT
// records.
//
// ## Architecture Overview
//
// - **ZoneApi**: Trait for the DNS provider's REST API (find zone, create
//   record, delete record)
// - **Zone Resolver**: Looks a zone up by name, with its full record set
// - **Hostname Normalizer**: Derives the zone-relative record name
// - **ChallengeSolver**: Implements the host-facing `Solver` contract
//   (present / clean up / initialize) on top of a `ZoneApi`
//
// ## Design Principles
//
// 1. **Stateless**: Zones are fetched fresh for every call, nothing is cached
// 2. **Exact cleanup**: Only the TXT record matching name AND key is deleted,
//    so concurrent challenges for the same hostname never clobber each other
// 3. **No retries**: Errors carry context and go back to the host, which
//    owns retry and backoff
// 4. **Explicit configuration**: Credentials are passed into constructors,
//    never read from the environment at call time

pub mod challenge;
pub mod config;
pub mod error;
pub mod hostname;
pub mod resolver;
pub mod shutdown;
pub mod solver;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use challenge::ChallengeRequest;
pub use config::{Credentials, HostConfig, SolverConfig};
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use hostname::relative_name;
pub use resolver::{resolve_zone, zone_search_term};
pub use shutdown::{ShutdownSignal, ShutdownTrigger};
pub use solver::ChallengeSolver;
pub use traits::{Solver, ZoneApi};
pub use zone::{NewRecord, Record, RecordType, Zone, ZoneSearchResult};
