/*!
# Admin Console

Client library and command-line front end for the administrative REST API
behind the company management dashboard.

## Overview

The dashboard lets administrators log in and manage companies, users, roles
and currencies. What they may see and do is decided by dot-delimited
permission strings issued by the server. This crate provides the client
side of that system:

- **Permission filtering** of the navigation tree, the search palette and
  the route guard, all through one matching rule
- **Authenticated requests** with bearer tokens and a single
  refresh-and-retry cycle on `401`
- **A reference-counted loading signal** that drives a busy indicator
  while requests are in flight
- **Typed CRUD** for every resource at both privilege tiers

## Architecture

### Core
- `permission` - Matching rule and navigation-tree filter
- `loading` - Loading counter with a show/hide observer
- `pipeline` - Token attachment, refresh and login redirect

### Transport and data
- `transport` - One HTTP exchange (`reqwest`)
- `endpoints` - REST paths for both tiers
- `models` - Request and response shapes
- `api` - Typed calls and per-resource CRUD
- `session` - Persisted tokens and preferences

### Shell
- `navigation`, `search`, `guard` - Menu state, quick-jump palette, route access
- `i18n` - Locale choice and string lookup
- `system` - Current user and permission catalog
- `shell` - Application root owning all of the above
- `config` - Defaults, TOML file and environment

## Permission rule

A granted permission satisfies a required one when they are equal or one
is a dot-bounded ancestor of the other: `admin.user` satisfies
`admin.user.update`, `admin.use` does not. An empty requirement is always
satisfied.
*/

pub mod api;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod guard;
pub mod i18n;
pub mod loading;
pub mod models;
pub mod navigation;
pub mod permission;
pub mod pipeline;
pub mod search;
pub mod session;
pub mod shell;
pub mod system;
pub mod transport;

pub use api::{AdminApi, Resource};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use guard::{RouteDecision, RouteTable};
pub use loading::{LoadingGuard, LoadingObserver, LoadingSignal};
pub use permission::{NavigationChild, NavigationItem, filter_tree, has_permission, permission_matches};
pub use pipeline::{ApiRequest, Attempt, LoginRedirect, Pipeline, RedirectFlag};
pub use session::{FileStore, MemoryStore, Session, TokenStore};
pub use shell::AdminShell;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, Transport};
