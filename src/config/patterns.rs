//! Default pattern lists for the configuration surface.
//!
//! Every list here is a closed default that `.archmap.toml` can replace
//! wholesale. The layer lists drive the weighted vote in
//! [`crate::analysis::layers`]; the keyword sets drive support-group
//! separation, infrastructure naming, and name-token filtering.

use std::collections::BTreeSet;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn controller_annotations() -> Vec<String> {
    list(&[
        "RestController",
        "Controller",
        "Resource",
        "Path",
        "WebServlet",
        "GET",
        "POST",
        "PUT",
        "DELETE",
        "PATCH",
    ])
}

pub(crate) fn business_annotations() -> Vec<String> {
    list(&[
        "Service",
        "Component",
        "Stateless",
        "Stateful",
        "MessageDriven",
        "Singleton",
        "Facade",
        "ApplicationScoped",
        "SessionScoped",
        "RequestScoped",
    ])
}

pub(crate) fn persistence_annotations() -> Vec<String> {
    list(&[
        "Repository",
        "Entity",
        "Table",
        "Dao",
        "Embeddable",
        "MappedSuperclass",
        "NamedQuery",
        "NamedQueries",
        "Column",
        "JoinColumn",
        "OneToMany",
        "ManyToOne",
        "ManyToMany",
        "OneToOne",
    ])
}

pub(crate) fn domain_annotations() -> Vec<String> {
    list(&["ValueObject", "DomainModel", "Immutable"])
}

pub(crate) fn transfer_annotations() -> Vec<String> {
    list(&[
        "JsonSerialize",
        "JsonDeserialize",
        "XmlRootElement",
        "XmlElement",
        "ApiModel",
        "Schema",
    ])
}

/// REST-facing annotations; presence disambiguates controllers from plain
/// interfaces and `.services.` packages.
pub(crate) fn rest_annotations() -> Vec<String> {
    list(&[
        "Path",
        "GET",
        "POST",
        "PUT",
        "DELETE",
        "PATCH",
        "RestController",
        "Controller",
        "WebServlet",
        "RequestMapping",
        "GetMapping",
        "PostMapping",
        "PutMapping",
        "DeleteMapping",
        "PatchMapping",
    ])
}

pub(crate) fn controller_name_patterns() -> Vec<String> {
    list(&["Controller", "Endpoint", "Resource", "API", "Rest", "Servlet"])
}

/// Names that must never classify as controllers (outbound clients and
/// message consumers).
pub(crate) fn non_controller_name_patterns() -> Vec<String> {
    list(&[
        "Consumer",
        "Client",
        "RestClient",
        "HttpClient",
        "FeignClient",
        "WebClient",
    ])
}

pub(crate) fn business_name_patterns() -> Vec<String> {
    list(&[
        "Service",
        "Business",
        "Manager",
        "Facade",
        "UseCase",
        "Handler",
        "Processor",
        "Bean",
        "Mdb",
        "Ejb",
    ])
}

pub(crate) fn persistence_name_patterns() -> Vec<String> {
    list(&[
        "Repository",
        "Dao",
        "DAO",
        "Entity",
        "Mapper",
        "Persistence",
        "DataAccess",
        "Provider",
    ])
}

pub(crate) fn domain_name_patterns() -> Vec<String> {
    list(&[
        "VO",
        "Vo",
        "ValueObject",
        "DomainModel",
        "DomainObject",
        "Model",
        "Domain",
    ])
}

pub(crate) fn transfer_name_patterns() -> Vec<String> {
    list(&[
        "DTO", "Dto", "Request", "Response", "Payload", "Message", "Command", "Query", "Event",
    ])
}

pub(crate) fn shared_name_patterns() -> Vec<String> {
    list(&[
        "Config",
        "Configuration",
        "Util",
        "Utils",
        "Helper",
        "Constants",
        "Exception",
        "Security",
        "Filter",
        "Interceptor",
        "Aspect",
        "Validator",
        "Consumer",
        "Client",
        "Factory",
    ])
}

pub(crate) fn controller_package_patterns() -> Vec<String> {
    list(&[
        ".controller.",
        ".rest.",
        ".endpoint.",
        ".web.",
        ".servlet.",
        ".resource.",
        ".services.",
    ])
}

pub(crate) fn business_package_patterns() -> Vec<String> {
    list(&[
        ".service.",
        ".business.",
        ".usecase.",
        ".facade.",
        ".application.",
        ".handler.",
        ".bean.",
        ".ejb.",
        ".mdb.",
        ".api.",
    ])
}

pub(crate) fn persistence_package_patterns() -> Vec<String> {
    list(&[
        ".repository.",
        ".dao.",
        ".persistence.",
        ".mapper.",
        ".entity.",
        ".entities.",
        ".domain.entity.",
        ".jpa.",
    ])
}

pub(crate) fn domain_package_patterns() -> Vec<String> {
    list(&[".domain.", ".vo.", ".valueobject.", ".model.", ".core."])
}

pub(crate) fn transfer_package_patterns() -> Vec<String> {
    list(&[
        ".dto.",
        ".request.",
        ".response.",
        ".payload.",
        ".api.model.",
        ".contract.",
        ".message.",
        ".command.",
        ".query.",
        ".event.",
    ])
}

pub(crate) fn shared_package_patterns() -> Vec<String> {
    list(&[
        ".config.",
        ".util.",
        ".utils.",
        ".common.",
        ".shared.",
        ".security.",
        ".exception.",
        ".filter.",
        ".interceptor.",
        ".aspect.",
        ".validation.",
        ".provider.",
    ])
}

/// Keywords that mark a component as infrastructure for support/business
/// group separation.
pub(crate) fn support_keywords() -> BTreeSet<String> {
    set(&[
        "application",
        "config",
        "configuration",
        "security",
        "auth",
        "swagger",
        "main",
        "exception",
        "error",
        "filter",
        "interceptor",
        "aspect",
        "openapi",
    ])
}

/// Tokens excluded from microservice names and token-similarity signals.
pub(crate) fn exclude_tokens() -> BTreeSet<String> {
    set(&[
        "entity",
        "model",
        "data",
        "dto",
        "event",
        "command",
        "query",
        "impl",
        "repository",
        "service",
        "controller",
        "api",
        "rest",
        "http",
        "adapter",
        "port",
        "localevents",
        "rabbit",
        "jpa",
        "repo",
        "dao",
        "operations",
        "listener",
        "publisher",
        "handler",
        "factory",
        "db",
        "usecase",
        "primaryports",
        "secondaryports",
    ])
}

/// Infrastructure naming keywords as ordered `(keyword, display)` pairs.
///
/// List position is the tie-break when two keywords match the same number
/// of members, so more specific keywords come first.
pub(crate) fn infra_keywords() -> Vec<(String, String)> {
    [
        ("security", "Seguridad"),
        ("auth", "Autenticación"),
        ("config", "Configuración"),
        ("swagger", "Documentación"),
        ("email", "Notificaciones por Email"),
        ("notification", "Notificaciones"),
        ("log", "Logging"),
        ("audit", "Auditoría"),
        ("application", "Aplicación Principal"),
    ]
    .iter()
    .map(|(k, d)| (k.to_string(), d.to_string()))
    .collect()
}
