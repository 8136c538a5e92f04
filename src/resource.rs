//! Resources, the operation descriptors they expose and the binding of route
//! parameters to operation inputs.

use thiserror::Error;
use tracing::warn;

use crate::{
    request::Request,
    response::Response,
    router::ParameterSet,
    status_code_registry::ReasonPhrase,
};

pub const RESOURCE_HEADER: &str = "X-Resource";

#[derive(Error, Debug)]
#[error("{resource} has no operation for {method}")]
pub struct MethodNotSupported {
    pub resource: String,
    pub method: String,
    pub allowed: Vec<String>,
}

#[derive(Error, Debug)]
#[error("{method} of {resource} did not return a response")]
pub struct InvalidHandlerResult {
    pub resource: String,
    pub method: String,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Role {
    /// Receives the request itself.
    RequestContext,
    /// Receives the route parameter of the same name, or the next unused one.
    Named,
    /// Receives the next unused route parameter.
    Positional,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Input {
    name: String,
    role: Role,
}

impl Input {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn request(name: impl Into<String>) -> Self {
        Self::new(name, Role::RequestContext)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Role::Named)
    }

    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, Role::Positional)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[derive(Debug)]
pub enum Argument<'a> {
    Request(&'a Request),
    /// `None` once the route parameters ran out.
    Value(Option<String>),
}

/// The bound inputs of one call, in declaration order.
#[derive(Debug)]
pub struct Arguments<'a>(Vec<(&'a str, Argument<'a>)>);

impl<'a> Arguments<'a> {
    pub fn get(&self, name: &str) -> Option<&Argument<'a>> {
        self.0
            .iter()
            .find(|(input, _)| *input == name)
            .map(|(_, arg)| arg)
    }

    /// The value bound to the input `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Argument::Value(value) => value.as_deref(),
            Argument::Request(_) => None,
        }
    }

    pub fn request(&self) -> Option<&'a Request> {
        self.0.iter().find_map(|(_, arg)| match arg {
            Argument::Request(r) => Some(*r),
            Argument::Value(_) => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument<'a>)> + '_ {
        self.0.iter().map(|(input, arg)| (*input, arg))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

type Call = Box<dyn for<'a> Fn(Arguments<'a>) -> Option<Response> + Send + Sync>;

/// One HTTP method of a resource with its declared inputs.
pub struct Operation {
    method: String,
    inputs: Vec<Input>,
    call: Call,
}

impl Operation {
    pub fn new<F>(method: &str, inputs: impl IntoIterator<Item = Input>, call: F) -> Self
    where
        F: for<'a> Fn(Arguments<'a>) -> Option<Response> + Send + Sync + 'static,
    {
        Self {
            method: method.to_uppercase(),
            inputs: inputs.into_iter().collect(),
            call: Box::new(call),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    fn bind<'a>(&'a self, r: &'a Request, mut params: ParameterSet) -> Arguments<'a> {
        let args = self
            .inputs
            .iter()
            .map(|input| {
                let arg = match input.role {
                    Role::RequestContext => Argument::Request(r),
                    Role::Named => Argument::Value(
                        params
                            .take_name(&input.name)
                            .or_else(|| params.take_next()),
                    ),
                    Role::Positional => Argument::Value(params.take_next()),
                };
                (input.name.as_str(), arg)
            })
            .collect();
        Arguments(args)
    }
}

pub trait Resource: Send + Sync {
    /// Identifies the implementation, reported in the `X-Resource` header.
    fn name(&self) -> &str;

    fn operations(&self) -> &[Operation];

    fn exec(&self, r: &Request, params: ParameterSet) -> anyhow::Result<Response> {
        dispatch(self, r, params)
    }
}

/// Runs the operation for the request method. `HEAD` runs the `GET`
/// operation; the body is dropped when the response is sent.
pub fn dispatch<R>(resource: &R, r: &Request, params: ParameterSet) -> anyhow::Result<Response>
where
    R: Resource + ?Sized,
{
    let method = if r.is_head() { "GET" } else { r.get_http_method() };

    let Some(operation) = resource.operations().iter().find(|op| op.method == method) else {
        return Err(MethodNotSupported {
            resource: resource.name().to_owned(),
            method: r.get_http_method().to_owned(),
            allowed: resource
                .operations()
                .iter()
                .map(|op| op.method.clone())
                .collect(),
        }
        .into());
    };

    let args = operation.bind(r, params);
    let Some(mut w) = (operation.call)(args) else {
        return Err(InvalidHandlerResult {
            resource: resource.name().to_owned(),
            method: method.to_owned(),
        }
        .into());
    };

    w.add_header(RESOURCE_HEADER, resource.name());
    Ok(w)
}

/// A resource assembled from operations.
pub struct Handler {
    name: String,
    operations: Vec<Operation>,
}

impl Handler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: vec![],
        }
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }
}

impl Resource for Handler {
    fn name(&self) -> &str {
        &self.name
    }

    fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

/// Answers a request the dispatcher could not hand to an operation. The
/// response is fixed: no operation lookup happens for the method.
pub trait Fallback: Send + Sync {
    fn respond(&self, r: &Request) -> Response;
}

impl<T> Fallback for T
where
    T: Fn(&Request) -> Response + Send + Sync,
{
    fn respond(&self, r: &Request) -> Response {
        self(r)
    }
}

/// Answers requests no route matched.
pub struct NotFound;

impl Fallback for NotFound {
    fn respond(&self, r: &Request) -> Response {
        let mut w = Response::new();
        w.set_reason_phrase(ReasonPhrase::NotFound);
        w.set_body_str(&format!(
            "Nothing was found for the resource \"{}\".",
            r.get_request_target()
        ));
        w
    }
}

/// Answers requests whose resource has no operation for the method.
pub struct MethodNotAllowed;

impl Fallback for MethodNotAllowed {
    fn respond(&self, r: &Request) -> Response {
        warn!(
            method = r.get_http_method(),
            uri = r.get_request_target(),
            "method not allowed"
        );
        let mut w = Response::new();
        w.set_reason_phrase(ReasonPhrase::MethodNotAllowed);
        w.set_body_str(&format!(
            "The HTTP method \"{}\" used for the request is not allowed for the resource \"{}\".",
            r.get_http_method(),
            r.get_request_target()
        ));
        w
    }
}
