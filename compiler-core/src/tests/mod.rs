
use compile_api::{ClientConfig, CompileClient, CompileError, ExitStatus};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{
    catalog::{Catalog, CatalogIndex},
    error::Error,
    presenter::OUTPUT_TRUNCATED,
    service::CompilerService,
};
use fixtures::{descriptor, python_and_cpp, successful_run, StaticBackend};

#[tokio::test]
async fn test_list_languages_refreshes_every_time() -> Result<(), Error> {
    let backend = Arc::new(StaticBackend::new(python_and_cpp()));
    let service = CompilerService::new(backend.clone());

    let pages = service.list_languages("ada").await?;
    service.list_languages("ada").await?;

    assert_eq!(backend.list_calls(), 2);
    assert_eq!(pages.len(), 1);
    let names: Vec<_> = pages[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["C++", "Python"]);
    assert_eq!(pages[0].fields[0].value, "2 compilers");
    Ok(())
}

#[tokio::test]
async fn test_language_info_lists_group_templates() -> Result<(), Error> {
    let backend = Arc::new(StaticBackend::new(python_and_cpp()));
    let service = CompilerService::new(backend);

    let pages = service.language_info("ada", "c++").await?;

    assert_eq!(
        pages[0].description.as_deref(),
        Some("Templates available: `clang`, `gcc`")
    );
    assert_eq!(pages[0].fields[0].name, "gcc-13.2.0 (default)");
    assert_eq!(pages[0].fields[1].name, "clang-17.0.1");
    Ok(())
}

#[tokio::test]
async fn test_template_loads_catalog_lazily() -> Result<(), Error> {
    let backend = Arc::new(
        StaticBackend::new(python_and_cpp()).with_template("cpython", "print('@everyone')"),
    );
    let service = CompilerService::new(backend.clone());

    let message = service.template("cpython").await?;
    service.template("cpython").await?;

    assert_eq!(message, "```print('@\u{200b}everyone')```");
    assert_eq!(backend.list_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_template() {
    let backend = Arc::new(StaticBackend::new(python_and_cpp()));
    let service = CompilerService::new(backend);

    let result = service.template("fortran").await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_compile_flow_uses_default_compiler() -> Result<(), Error> {
    let backend = Arc::new(
        StaticBackend::new(python_and_cpp()).with_compile_outcome(Ok(successful_run("1\n"))),
    );
    let service = CompilerService::new(backend.clone());

    let prepared = service
        .prepare_compile("ada", "Python", "```python\nprint(1)\n```")
        .await?;
    let embed = service.run_compile("ada", &prepared).await?;

    let request = backend.last_request().expect("compile was called");
    assert_eq!(request.compiler, "cpython-3.12.0");
    assert_eq!(request.code, "print(1)");
    assert!(request.save);
    assert_eq!(embed.title, "Compilation results");
    assert_eq!(embed.description.as_deref(), Some("Status: 0"));
    assert_eq!(embed.fields[0].value, "```1\n```");
    Ok(())
}

#[tokio::test]
async fn test_compile_by_display_name() -> Result<(), Error> {
    let backend = Arc::new(StaticBackend::new(python_and_cpp()));
    let service = CompilerService::new(backend);

    let prepared = service
        .prepare_compile("ada", "PyPy", "```\nprint(1)\n```")
        .await?;

    assert_eq!(prepared.compiler.name, "pypy-3.10-v7.3.15");
    Ok(())
}

#[tokio::test]
async fn test_compile_unknown_target() {
    let backend = Arc::new(StaticBackend::new(python_and_cpp()));
    let service = CompilerService::new(backend);

    let result = service
        .prepare_compile("ada", "brainfuck", "```\n+++\n```")
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_compile_without_code_block() {
    let backend = Arc::new(StaticBackend::new(python_and_cpp()));
    let service = CompilerService::new(backend.clone());

    let result = service.prepare_compile("ada", "python", "print(1)").await;
    assert!(matches!(result, Err(Error::MalformedInput(_))));
    assert_eq!(backend.compile_calls(), 0);
}

#[tokio::test]
async fn test_compile_error_is_typed() -> Result<(), Error> {
    let backend = Arc::new(
        StaticBackend::new(python_and_cpp())
            .with_compile_outcome(Err(CompileError::new(Some(500), "Internal Server Error"))),
    );
    let service = CompilerService::new(backend);

    let prepared = service
        .prepare_compile("ada", "c++", "```cpp\nint main() {}\n```")
        .await?;
    let result = service.run_compile("ada", &prepared).await;

    match result {
        Err(Error::Compile(e)) => assert_eq!(e.status_code, Some(500)),
        other => panic!("expected compile error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_truncated_program_error() -> Result<(), Error> {
    let mut run = successful_run("ok");
    run.status = ExitStatus::Signaled("Killed".to_string());
    run.program_error = "e".repeat(1500);
    let backend =
        Arc::new(StaticBackend::new(python_and_cpp()).with_compile_outcome(Ok(run)));
    let service = CompilerService::new(backend);

    let prepared = service
        .prepare_compile("ada", "python", "```py\nwhile True: pass\n```")
        .await?;
    let embed = service.run_compile("ada", &prepared).await?;

    assert_eq!(embed.description.as_deref(), Some(OUTPUT_TRUNCATED));
    assert_eq!(embed.fields.len(), 2);
    assert_eq!(embed.fields[0].value, "```ok```");
    Ok(())
}

#[tokio::test]
async fn test_unavailable_service() {
    let backend = Arc::new(StaticBackend::new(python_and_cpp()).unavailable());
    let service = CompilerService::new(backend);

    let result = service.list_languages("ada").await;
    assert!(matches!(result, Err(Error::ServiceUnavailable(_))));
}

#[tokio::test]
async fn test_injected_catalog_skips_fetch() -> Result<(), Error> {
    let backend = Arc::new(StaticBackend::new(Vec::new()));
    let catalog = Catalog::from_compilers(vec![descriptor("ghc-9.8", "ghc", "Haskell", &[])]);
    let service =
        CompilerService::with_catalog(backend.clone(), Arc::new(CatalogIndex::with_catalog(catalog)));

    let prepared = service
        .prepare_compile("ada", "haskell", "```hs\nmain = print 1\n```")
        .await?;

    assert_eq!(prepared.compiler.name, "ghc-9.8");
    assert_eq!(backend.list_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_refresh_swaps_whole_catalog() -> Result<(), Error> {
    let index = Arc::new(CatalogIndex::new());
    let first = StaticBackend::new(python_and_cpp());
    let second = StaticBackend::new(vec![descriptor("rustc-1.80", "rustc", "Rust", &[])]);

    let before = index.refresh(&first).await?;
    let after = index.refresh(&second).await?;

    // Old snapshots stay intact for readers still holding them
    assert_eq!(before.languages().len(), 2);
    assert_eq!(after.languages().len(), 1);
    assert_eq!(index.snapshot().await.languages()[0].name, "Rust");
    Ok(())
}

#[tokio::test]
async fn test_client_backend_against_mock_service() -> Result<(), Error> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/list.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "cpython-3.12.0",
                "display-name": "CPython",
                "language": "Python",
                "version": "3.12.0",
                "templates": ["cpython"]
            }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/compile.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signal": "Killed",
            "program_output": "partial",
            "url": "https://wandbox.org/permlink/killed"
        })))
        .mount(&mock_server)
        .await;

    let client = CompileClient::new(ClientConfig::new().with_api_url(mock_server.uri()))
        .expect("client builds");
    let service = CompilerService::new(Arc::new(client));

    let prepared = service
        .prepare_compile("ada", "python", "```\nwhile True: pass\n```")
        .await?;
    let embed = service.run_compile("ada", &prepared).await?;

    assert_eq!(embed.description.as_deref(), Some("Status: Killed"));
    assert_eq!(embed.url.as_deref(), Some("https://wandbox.org/permlink/killed"));
    Ok(())
}

#[tokio::test]
async fn test_client_backend_list_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/list.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = CompileClient::new(ClientConfig::new().with_api_url(mock_server.uri()))
        .expect("client builds");
    let service = CompilerService::new(Arc::new(client));

    let result = service.list_languages("ada").await;
    assert!(matches!(result, Err(Error::ServiceUnavailable(_))));
}
