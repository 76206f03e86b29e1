//! In-memory session double for page-object tests.
//!
//! Implements the crate's session seams over a scripted DOM tree: elements
//! are registered under selector strings, can stay hidden for a number of
//! lookups (simulating late rendering), and interpret the small script
//! vocabulary the widgets rely on.

// Not every helper is exercised by every test binary.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use voltron::selector::By;
use voltron::session::{BrowserSession, ElementHandle, Handle, ScriptArg, SearchContext};
use voltron::{Error, Result};

// ============================================================================
// Element State
// ============================================================================

#[derive(Default)]
pub struct ElementState {
    pub text: String,
    pub attributes: HashMap<String, String>,
    pub displayed: bool,
    pub selected: bool,
    pub value: String,
    pub clicks: usize,
}

struct ChildSlot {
    elements: Vec<Arc<MockElement>>,
    /// Lookups to fail with "not found" before the slot materializes.
    misses_left: AtomicUsize,
}

// ============================================================================
// MockElement
// ============================================================================

pub struct MockElement {
    id: String,
    pub state: Mutex<ElementState>,
    children: Mutex<HashMap<String, ChildSlot>>,
    /// Element whose selected state flips when this one is clicked.
    toggle_target: Mutex<Option<Arc<MockElement>>>,
}

impl MockElement {
    pub fn new(id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            state: Mutex::new(ElementState {
                displayed: true,
                ..ElementState::default()
            }),
            children: Mutex::new(HashMap::new()),
            toggle_target: Mutex::new(None),
        })
    }

    pub fn with_text(self: &Arc<Self>, text: impl Into<String>) -> Arc<Self> {
        self.state.lock().text = text.into();
        Arc::clone(self)
    }

    pub fn with_attribute(
        self: &Arc<Self>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Arc<Self> {
        self.state.lock().attributes.insert(name.into(), value.into());
        Arc::clone(self)
    }

    pub fn hidden(self: &Arc<Self>) -> Arc<Self> {
        self.state.lock().displayed = false;
        Arc::clone(self)
    }

    pub fn add_children(self: &Arc<Self>, selector: &str, elements: Vec<Arc<MockElement>>) {
        self.add_children_after(selector, elements, 0);
    }

    pub fn add_children_after(
        self: &Arc<Self>,
        selector: &str,
        elements: Vec<Arc<MockElement>>,
        misses: usize,
    ) {
        self.children.lock().insert(
            selector.to_string(),
            ChildSlot {
                elements,
                misses_left: AtomicUsize::new(misses),
            },
        );
    }

    pub fn toggles(self: &Arc<Self>, target: &Arc<MockElement>) {
        *self.toggle_target.lock() = Some(Arc::clone(target));
    }

    fn perform_click(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.attributes.contains_key("unclickable") {
                return Err(Error::not_interactable(format!(
                    "element {} refuses pointer interaction",
                    self.id
                )));
            }
            state.clicks += 1;
        }
        if let Some(target) = self.toggle_target.lock().as_ref() {
            let mut state = target.state.lock();
            state.selected = !state.selected;
        }
        Ok(())
    }
}

fn lookup(children: &Mutex<HashMap<String, ChildSlot>>, by: &By) -> Vec<Arc<MockElement>> {
    let key = by.to_string();
    let registry = children.lock();
    match registry.get(&key) {
        Some(slot) => {
            let misses = slot.misses_left.load(Ordering::SeqCst);
            if misses > 0 {
                slot.misses_left.store(misses - 1, Ordering::SeqCst);
                Vec::new()
            } else {
                slot.elements.clone()
            }
        }
        None => Vec::new(),
    }
}

#[async_trait]
impl SearchContext for MockElement {
    async fn find(&self, by: &By) -> Result<Handle> {
        lookup(&self.children, by)
            .into_iter()
            .next()
            .map(|e| e as Handle)
            .ok_or_else(|| Error::element_not_found(by.to_string()))
    }

    async fn find_all(&self, by: &By) -> Result<Vec<Handle>> {
        Ok(lookup(&self.children, by)
            .into_iter()
            .map(|e| e as Handle)
            .collect())
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    fn handle_id(&self) -> &str {
        &self.id
    }

    async fn click(&self) -> Result<()> {
        self.perform_click()
    }

    async fn text(&self) -> Result<String> {
        Ok(self.state.lock().text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.state.lock().attributes.get(name).cloned())
    }

    async fn is_displayed(&self) -> Result<bool> {
        Ok(self.state.lock().displayed)
    }

    async fn is_selected(&self) -> Result<bool> {
        Ok(self.state.lock().selected)
    }

    async fn send_keys(&self, keys: &str) -> Result<()> {
        self.state.lock().value.push_str(keys);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.state.lock().value.clear();
        Ok(())
    }
}

// ============================================================================
// MockSession
// ============================================================================

#[derive(Default)]
pub struct MockSession {
    roots: Mutex<HashMap<String, ChildSlot>>,
    /// Handle-id index so scripts can resolve element arguments.
    index: Mutex<HashMap<String, Arc<MockElement>>>,
    pub visited: Mutex<Vec<String>>,
    pub closes: AtomicUsize,
}

impl MockSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates an element tracked by this session's script index.
    pub fn element(self: &Arc<Self>, id: impl Into<String>) -> Arc<MockElement> {
        let element = MockElement::new(id);
        self.index
            .lock()
            .insert(element.id.clone(), Arc::clone(&element));
        element
    }

    pub fn register(self: &Arc<Self>, selector: &str, elements: Vec<Arc<MockElement>>) {
        self.register_after(selector, elements, 0);
    }

    pub fn register_after(
        self: &Arc<Self>,
        selector: &str,
        elements: Vec<Arc<MockElement>>,
        misses: usize,
    ) {
        self.roots.lock().insert(
            selector.to_string(),
            ChildSlot {
                elements,
                misses_left: AtomicUsize::new(misses),
            },
        );
    }

    fn resolve(&self, arg: &ScriptArg) -> Result<Arc<MockElement>> {
        match arg {
            ScriptArg::Element(handle) => self
                .index
                .lock()
                .get(handle.handle_id())
                .cloned()
                .ok_or_else(|| Error::stale_element(handle.handle_id())),
            ScriptArg::Value(_) => Err(Error::script("expected element argument")),
        }
    }
}

#[async_trait]
impl SearchContext for MockSession {
    async fn find(&self, by: &By) -> Result<Handle> {
        lookup(&self.roots, by)
            .into_iter()
            .next()
            .map(|e| e as Handle)
            .ok_or_else(|| Error::element_not_found(by.to_string()))
    }

    async fn find_all(&self, by: &By) -> Result<Vec<Handle>> {
        Ok(lookup(&self.roots, by)
            .into_iter()
            .map(|e| e as Handle)
            .collect())
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visited.lock().push(url.to_string());
        Ok(())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value> {
        if script.contains("scrollIntoView") || script.contains("window.scrollTo") {
            return Ok(Value::Null);
        }
        if script.contains("return arguments[0].value;") {
            let element = self.resolve(&args[0])?;
            let value = element.state.lock().value.clone();
            return Ok(Value::String(value));
        }
        if script.contains("arguments[0].value = arguments[1]") {
            let element = self.resolve(&args[0])?;
            let value = match &args[1] {
                ScriptArg::Value(Value::String(s)) => s.clone(),
                _ => return Err(Error::script("expected string argument")),
            };
            element.state.lock().value = value;
            return Ok(Value::Null);
        }
        if script.contains("arguments[0].click()") {
            let element = self.resolve(&args[0])?;
            element.perform_click()?;
            return Ok(Value::Null);
        }
        Err(Error::script(format!("unsupported script: {script}")))
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
