//! # `rhai`-backed Sandbox Adapter
//!
//! Wraps deployed contract source into a small dispatch template and
//! runs it on a fresh [`rhai::Engine`] per call. No globals are shared
//! across runs: a contract cannot stash a reference to the host and
//! retrieve it on a later, unrelated call.

use crate::domain::{EmittedEvent, SandboxError, SandboxOutcome};
use crate::ports::{Artifact, HostDb, RunContext, Sandbox};
use rhai::{Dynamic, Engine, EvalAltResult, Position, Scope};
use serde_json::Value;
use state_store::{Document, Query};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Every deployed contract's source is spliced into this template before
/// compilation: it declares the `actions` dispatch map the user code is
/// expected to populate, then invokes the requested action if one was
/// registered.
pub const DISPATCH_TEMPLATE: &str = r#"
let actions = #{};

{{USER_CODE}}

if action in actions {
    actions[action].call(payload)
} else {
    ()
}
"#;

/// Splices `source` into [`DISPATCH_TEMPLATE`].
pub fn wrap_source(source: &str) -> String {
    DISPATCH_TEMPLATE.replace("{{USER_CODE}}", source)
}

/// Deterministic operation ceiling backing the wall-clock quantum; keeps
/// a contract from out-looping the interpreter even on a very fast host.
const MAX_OPERATIONS: u64 = 50_000_000;

/// `rhai`-backed [`Sandbox`]. Holds no state of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct RhaiSandbox;

impl Sandbox for RhaiSandbox {
    fn compile(&self, source: &str) -> Result<Artifact, SandboxError> {
        Engine::new()
            .compile(wrap_source(source))
            .map_err(|_| SandboxError::CompileError)
    }

    fn run(&self, artifact: &Artifact, ctx: RunContext) -> Result<SandboxOutcome, SandboxError> {
        let RunContext {
            host,
            is_deploy,
            db,
            quantum,
            reenter,
        } = ctx;

        let events: Rc<RefCell<Vec<EmittedEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let db: Rc<RefCell<Box<dyn HostDb>>> = Rc::new(RefCell::new(db));
        let reenter = Rc::new(RefCell::new(reenter));

        let mut engine = Engine::new();
        engine.set_max_operations(MAX_OPERATIONS);

        let start = Instant::now();
        engine.on_progress(move |_ops| {
            if start.elapsed() > quantum {
                Some(Dynamic::UNIT)
            } else {
                None
            }
        });
        engine.on_debug(|text, _source, pos| {
            tracing::debug!(?pos, %text, "contract debug() call");
        });

        engine.register_type_with_name::<DbHandle>("Db");
        engine.register_fn("getTable", DbHandle::get_table);
        if is_deploy {
            engine.register_fn("createTable", DbHandle::create_table);
        }

        engine.register_type_with_name::<TableHandle>("Table");
        engine.register_fn("insert", TableHandle::insert);
        engine.register_fn("find", TableHandle::find);
        engine.register_fn("findOne", TableHandle::find_one);
        engine.register_fn("update", TableHandle::update);

        {
            let db = db.clone();
            engine.register_fn(
                "findInTable",
                move |contract: &str, table: &str, query: Dynamic| -> Dynamic {
                    let docs = db
                        .borrow()
                        .find_in_table(contract, table, &dynamic_to_query(query));
                    documents_to_dynamic(docs)
                },
            );
        }
        {
            let db = db.clone();
            engine.register_fn(
                "findOneInTable",
                move |contract: &str, table: &str, query: Dynamic| -> Dynamic {
                    match db
                        .borrow()
                        .find_one_in_table(contract, table, &dynamic_to_query(query))
                    {
                        Some(doc) => document_to_dynamic(doc),
                        None => Dynamic::UNIT,
                    }
                },
            );
        }
        {
            let events = events.clone();
            engine.register_fn("emit", move |event: &str, data: Dynamic| {
                events.borrow_mut().push(EmittedEvent {
                    event: event.to_string(),
                    data: dynamic_to_value(data),
                });
            });
        }
        {
            let events = events.clone();
            let reenter = reenter.clone();
            engine.register_fn(
                "executeSmartContract",
                move |contract: &str, action: &str, payload: Dynamic| -> Result<Dynamic, Box<EvalAltResult>> {
                    let payload = dynamic_to_value(payload);
                    let outcome = (reenter.borrow_mut())(contract, action, payload)
                        .map_err(sandbox_error_to_rhai)?;
                    events.borrow_mut().extend(outcome.events);
                    Ok(Dynamic::UNIT)
                },
            );
        }

        let mut scope = Scope::new();
        scope.push("sender", option_string_to_dynamic(host.sender));
        scope.push("owner", option_string_to_dynamic(host.owner));
        scope.push("action", host.action.clone());
        scope.push("payload", value_to_dynamic(host.payload));
        scope.push("db", Dynamic::from(DbHandle { db: db.clone() }));

        match engine.eval_ast_with_scope::<Dynamic>(&mut scope, artifact) {
            Ok(_) => Ok(SandboxOutcome {
                events: Rc::try_unwrap(events)
                    .map(RefCell::into_inner)
                    .unwrap_or_default(),
            }),
            Err(err) => Err(rhai_error_to_sandbox_error(*err)),
        }
    }
}

/// The `db` object exposed to every contract run. `createTable` is only
/// ever registered on the engine for the deploy bootstrap call, so
/// calling it during an invoke is a plain "function not found" fault —
/// matching the host-object contract's "absent" column for invoke mode.
#[derive(Clone)]
struct DbHandle {
    db: Rc<RefCell<Box<dyn HostDb>>>,
}

impl DbHandle {
    fn create_table(&mut self, name: &str) -> Dynamic {
        match self.db.borrow_mut().create_table(name) {
            Some(qualified) => Dynamic::from(TableHandle {
                db: self.db.clone(),
                qualified,
            }),
            None => Dynamic::UNIT,
        }
    }

    fn get_table(&mut self, name: &str) -> Dynamic {
        match self.db.borrow().get_table(name) {
            Some(qualified) => Dynamic::from(TableHandle {
                db: self.db.clone(),
                qualified,
            }),
            None => Dynamic::UNIT,
        }
    }
}

/// A handle to one table already owned by the calling contract, as
/// returned by `db.createTable`/`db.getTable`.
#[derive(Clone)]
struct TableHandle {
    db: Rc<RefCell<Box<dyn HostDb>>>,
    qualified: String,
}

impl TableHandle {
    fn insert(&mut self, doc: Dynamic) -> Dynamic {
        self.db
            .borrow_mut()
            .insert(&self.qualified, dynamic_to_document(doc));
        Dynamic::UNIT
    }

    fn find(&mut self, query: Dynamic) -> Dynamic {
        let docs = self.db.borrow().find(&self.qualified, &dynamic_to_query(query));
        documents_to_dynamic(docs)
    }

    fn find_one(&mut self, query: Dynamic) -> Dynamic {
        match self.db.borrow().find_one(&self.qualified, &dynamic_to_query(query)) {
            Some(doc) => document_to_dynamic(doc),
            None => Dynamic::UNIT,
        }
    }

    fn update(&mut self, doc: Dynamic) -> Dynamic {
        self.db
            .borrow_mut()
            .update(&self.qualified, dynamic_to_document(doc));
        Dynamic::UNIT
    }
}

fn value_to_dynamic(value: Value) -> Dynamic {
    rhai::serde::to_dynamic(&value).unwrap_or(Dynamic::UNIT)
}

fn dynamic_to_value(dynamic: Dynamic) -> Value {
    rhai::serde::from_dynamic(&dynamic).unwrap_or(Value::Null)
}

fn dynamic_to_document(dynamic: Dynamic) -> Document {
    match dynamic_to_value(dynamic) {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

fn dynamic_to_query(dynamic: Dynamic) -> Query {
    dynamic_to_document(dynamic)
}

fn document_to_dynamic(doc: Document) -> Dynamic {
    value_to_dynamic(Value::Object(doc))
}

fn documents_to_dynamic(docs: Vec<Document>) -> Dynamic {
    value_to_dynamic(Value::Array(docs.into_iter().map(Value::Object).collect()))
}

fn option_string_to_dynamic(value: Option<String>) -> Dynamic {
    match value {
        Some(s) => Dynamic::from(s),
        None => Dynamic::UNIT,
    }
}

/// Tags a propagated [`SandboxError`] so the top-level call can recover
/// its exact variant instead of collapsing every reentrant fault to a
/// generic runtime error.
fn sandbox_error_to_rhai(err: SandboxError) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(
        Dynamic::from(err.to_string()),
        Position::NONE,
    ))
}

fn rhai_error_to_sandbox_error(err: EvalAltResult) -> SandboxError {
    match err {
        EvalAltResult::ErrorTerminated(..) => SandboxError::Timeout,
        EvalAltResult::ErrorRuntime(value, _) => match value.into_string().ok().as_deref() {
            Some("compile_error") => SandboxError::CompileError,
            Some("timeout") => SandboxError::Timeout,
            Some("depth_exceeded") => SandboxError::DepthExceeded,
            _ => SandboxError::RuntimeError,
        },
        _ => SandboxError::RuntimeError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HostObject;
    use std::time::Duration;

    struct NullDb;
    impl HostDb for NullDb {
        fn create_table(&mut self, _logical_name: &str) -> Option<String> {
            None
        }
        fn get_table(&self, _logical_name: &str) -> Option<String> {
            None
        }
        fn find(&self, _qualified_table: &str, _query: &Query) -> Vec<Document> {
            Vec::new()
        }
        fn insert(&mut self, _qualified_table: &str, _doc: Document) {}
        fn update(&mut self, _qualified_table: &str, _doc: Document) -> bool {
            false
        }
        fn find_in_table(&self, _contract: &str, _table: &str, _query: &Query) -> Vec<Document> {
            Vec::new()
        }
    }

    fn run_source(source: &str, action: &str, payload: Value) -> Result<SandboxOutcome, SandboxError> {
        let sandbox = RhaiSandbox;
        let artifact = sandbox.compile(source)?;
        sandbox.run(
            &artifact,
            RunContext {
                host: HostObject {
                    sender: Some("alice".into()),
                    owner: Some("alice".into()),
                    action: action.into(),
                    payload,
                },
                is_deploy: false,
                db: Box::new(NullDb),
                quantum: Duration::from_secs(1),
                reenter: Box::new(|_, _, _| Ok(SandboxOutcome::default())),
            },
        )
    }

    #[test]
    fn emits_an_event() {
        let outcome = run_source(
            "actions.mint = |p| { emit(\"minted\", p); };",
            "mint",
            serde_json::json!({"amount": 10}),
        )
        .unwrap();
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].event, "minted");
        assert_eq!(outcome.events[0].data, serde_json::json!({"amount": 10}));
    }

    #[test]
    fn unknown_action_is_a_no_op() {
        let outcome = run_source("actions.mint = |p| { emit(\"minted\", p); };", "burn", Value::Null).unwrap();
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn compile_error_is_reported() {
        let sandbox = RhaiSandbox;
        let err = sandbox.compile("let x = ;").unwrap_err();
        assert_eq!(err, SandboxError::CompileError);
    }

    #[test]
    fn timeout_is_reported() {
        let outcome = run_source_with_quantum(
            "actions.spin = |p| { while true {} };",
            "spin",
            Value::Null,
            Duration::from_millis(20),
        );
        assert_eq!(outcome.unwrap_err(), SandboxError::Timeout);
    }

    fn run_source_with_quantum(
        source: &str,
        action: &str,
        payload: Value,
        quantum: Duration,
    ) -> Result<SandboxOutcome, SandboxError> {
        let sandbox = RhaiSandbox;
        let artifact = sandbox.compile(source)?;
        sandbox.run(
            &artifact,
            RunContext {
                host: HostObject {
                    sender: Some("alice".into()),
                    owner: Some("alice".into()),
                    action: action.into(),
                    payload,
                },
                is_deploy: false,
                db: Box::new(NullDb),
                quantum,
                reenter: Box::new(|_, _, _| Ok(SandboxOutcome::default())),
            },
        )
    }
}
