//! Dispatches a single transaction: decides deploy vs. invoke, builds
//! the host object and sandbox context, and turns the outcome (or
//! fault) into the JSON that becomes the transaction's logs.

use crate::adapters::StoreHostDb;
use crate::config::{ExecutionConfig, MAX_CALL_DEPTH};
use crate::error::{DispatchFault, EngineError};
use contract_sandbox::{HostObject, RhaiSandbox, RunContext, Sandbox, SandboxError, SandboxOutcome};
use serde_json::Value;
use state_store::{get_contract, insert_contract, ContractRecord, MemoryStore};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// The reserved contract/action pair a deploy transaction must use.
const DEPLOY_CONTRACT: &str = "contract";
const DEPLOY_ACTION: &str = "deploy";
/// The action name reserved for the deploy bootstrap call; no later
/// transaction may invoke it.
const RESERVED_ACTION: &str = "create";

/// Dispatches transactions against a shared store. Cheap to clone: all
/// state (the store, the reentrancy depth counter) is held behind
/// `Rc`, so a clone shares the same chain state rather than forking it.
/// Cloning is how reentrant calls get their own handle to call back
/// into dispatch without borrowing `self` mutably across a closure.
#[derive(Clone)]
pub struct Executor {
    store: Rc<RefCell<MemoryStore>>,
    sandbox: RhaiSandbox,
    quantum: Duration,
    depth: Rc<Cell<usize>>,
}

impl Executor {
    pub(crate) fn new(store: Rc<RefCell<MemoryStore>>, config: &ExecutionConfig) -> Self {
        Self {
            store,
            sandbox: RhaiSandbox,
            quantum: config.quantum,
            depth: Rc::new(Cell::new(0)),
        }
    }

    /// Runs one transaction to completion and returns the logs to
    /// attach to it. Never panics on contract-caused failure: every
    /// `DispatchFault` is folded into the returned value.
    pub fn execute(
        &self,
        sender: Option<&str>,
        contract: Option<&str>,
        action: Option<&str>,
        payload: Option<&str>,
    ) -> Value {
        let payload = payload
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(Value::Null);
        match self.dispatch(sender, contract, action, payload) {
            Ok(outcome) => logs_from_outcome(&outcome),
            Err(fault) => logs_from_fault(&fault),
        }
    }

    fn dispatch(
        &self,
        sender: Option<&str>,
        contract: Option<&str>,
        action: Option<&str>,
        payload: Value,
    ) -> Result<SandboxOutcome, DispatchFault> {
        let (sender, contract, action) = match (sender, contract, action) {
            (Some(s), Some(c), Some(a)) => (s, c, a),
            _ => return Err(DispatchFault::MissingOperands),
        };

        if contract == DEPLOY_CONTRACT && action == DEPLOY_ACTION {
            self.deploy(sender, payload)
        } else {
            self.invoke(sender, contract, action, payload)
        }
    }

    fn deploy(&self, sender: &str, payload: Value) -> Result<SandboxOutcome, DispatchFault> {
        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let code_b64 = payload.get("code").and_then(Value::as_str).map(str::to_string);
        let (name, code_b64) = match (name, code_b64) {
            (Some(name), Some(code)) => (name, code),
            _ => return Err(DispatchFault::BadDeployPayload),
        };

        if get_contract(&*self.store.borrow(), &name).is_some() {
            return Err(DispatchFault::DuplicateContract);
        }

        let decoded = base64::decode(&code_b64).map_err(|_| DispatchFault::BadDeployPayload)?;
        let source = String::from_utf8(decoded).map_err(|_| DispatchFault::BadDeployPayload)?;
        let artifact = self.sandbox.compile(&source)?;

        let params = payload.get("params").cloned().unwrap_or(Value::Null);
        let host_db = StoreHostDb::new(self.store.clone(), name.clone(), true, Default::default());

        let outcome = self.sandbox.run(
            &artifact,
            RunContext {
                host: HostObject {
                    sender: None,
                    owner: None,
                    action: RESERVED_ACTION.to_string(),
                    payload: params,
                },
                is_deploy: true,
                db: Box::new(host_db.clone()),
                quantum: self.quantum,
                reenter: self.reenter_hook(sender.to_string()),
            },
        )?;

        // The duplicate check above already ran against the same,
        // single-threaded store; a failure here means the store and the
        // registry have drifted out of sync, not that `name` is taken.
        insert_contract(
            &mut *self.store.borrow_mut(),
            ContractRecord {
                name,
                owner: sender.to_string(),
                code: source,
                tables: host_db.created_tables(),
            },
        )
        .unwrap_or_else(|err| panic!("{}", EngineError::InconsistentState(err.to_string())));

        Ok(outcome)
    }

    fn invoke(
        &self,
        sender: &str,
        contract: &str,
        action: &str,
        payload: Value,
    ) -> Result<SandboxOutcome, DispatchFault> {
        if action == RESERVED_ACTION {
            return Err(DispatchFault::ReservedAction);
        }

        let record =
            get_contract(&*self.store.borrow(), contract).ok_or(DispatchFault::UnknownContract)?;

        let payload = if payload.is_object() {
            payload
        } else {
            Value::Object(Default::default())
        };

        let artifact = self.sandbox.compile(&record.code)?;
        let host_db = StoreHostDb::new(self.store.clone(), contract.to_string(), false, record.tables);

        let outcome = self.sandbox.run(
            &artifact,
            RunContext {
                host: HostObject {
                    sender: Some(sender.to_string()),
                    owner: Some(record.owner),
                    action: action.to_string(),
                    payload,
                },
                is_deploy: false,
                db: Box::new(host_db),
                quantum: self.quantum,
                reenter: self.reenter_hook(sender.to_string()),
            },
        )?;

        Ok(outcome)
    }

    /// Builds the `executeSmartContract` hook for one run. The sender
    /// propagated to every reentrant call is the *original* caller of
    /// this run, deploy or invoke, not the contract doing the calling.
    fn reenter_hook(&self, sender: String) -> Box<contract_sandbox::ReentrantCall> {
        let executor = self.clone();
        Box::new(move |contract: &str, action: &str, payload: Value| {
            executor.reenter(&sender, contract, action, payload)
        })
    }

    fn reenter(
        &self,
        sender: &str,
        contract: &str,
        action: &str,
        payload: Value,
    ) -> Result<SandboxOutcome, SandboxError> {
        let depth = self.depth.get() + 1;
        if depth > MAX_CALL_DEPTH {
            return Err(SandboxError::DepthExceeded);
        }
        self.depth.set(depth);
        let result = self
            .dispatch(Some(sender), Some(contract), Some(action), payload)
            .map_err(fault_to_sandbox_error);
        self.depth.set(depth - 1);
        result
    }
}

fn fault_to_sandbox_error(fault: DispatchFault) -> SandboxError {
    match fault {
        DispatchFault::Sandbox(err) => err,
        _ => SandboxError::RuntimeError,
    }
}

fn logs_from_outcome(outcome: &SandboxOutcome) -> Value {
    let events: Vec<Value> = outcome
        .events
        .iter()
        .map(|event| serde_json::json!({"event": event.event, "data": event.data}))
        .collect();
    serde_json::json!({ "events": events })
}

fn logs_from_fault(fault: &DispatchFault) -> Value {
    match fault {
        DispatchFault::Sandbox(err) => {
            serde_json::json!({"error": {"name": err.name(), "message": err.message()}})
        }
        other => serde_json::json!({ "error": other.to_string() }),
    }
}
