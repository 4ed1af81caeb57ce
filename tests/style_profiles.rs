//! Integration tests for style profile resolution and application

use std::fs;
use std::panic::{self, AssertUnwindSafe};

use pretty_assertions::assert_eq;

mod common;

use figure_template::{StyleContext, StyleError, StyleLibrary, StyleParams, StyleProfile};

fn bundled() -> StyleContext {
    StyleContext::new(StyleLibrary::bundled())
}

/// A style directory holding only `notebook.figstyle` with `source`
fn library_with_notebook(source: &str) -> (tempfile::TempDir, StyleLibrary) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    fs::write(dir.path().join("notebook.figstyle"), source).expect("Should write style");
    let library = StyleLibrary::new(dir.path());
    (dir, library)
}

#[test]
fn test_three_profiles_resolve() {
    let library = StyleLibrary::bundled();
    for tag in ["notebook", "slides", "paper"] {
        let path = library.resolve(tag).expect("Should resolve bundled profile");
        assert!(path.is_file());
        assert_eq!(path.file_name().unwrap(), format!("{}.figstyle", tag).as_str());
    }
}

#[test]
fn test_other_tags_are_rejected() {
    let library = StyleLibrary::bundled();
    for tag in ["", "Notebook", "poster", "paper.figstyle"] {
        let err = library.resolve(tag).unwrap_err();
        assert!(
            matches!(err, StyleError::InvalidProfile { ref name } if name == tag),
            "unexpected error for {:?}: {}",
            tag,
            err
        );
    }
}

#[test]
fn test_missing_resource_leaves_context_untouched() {
    let (_dir, library) = library_with_notebook("font.size : 12\n");
    let mut ctx = StyleContext::new(library);
    let err = ctx.use_style("paper").unwrap_err();
    assert!(matches!(err, StyleError::MissingResource { .. }));
    assert_eq!(ctx.params(), &StyleParams::default());
}

#[test]
fn test_profiles_differ() {
    let mut sizes = Vec::new();
    for profile in StyleProfile::ALL {
        let mut ctx = bundled();
        ctx.use_style(profile.tag()).expect("Should apply profile");
        sizes.push(ctx.params().font_size);
    }
    assert_eq!(sizes, vec![11.0, 16.0, 8.0]);
}

#[test]
fn test_scoped_restores_after_success() {
    let mut ctx = bundled();
    let inside = ctx
        .with_style("slides", |ctx| ctx.params().lines_linewidth)
        .expect("Should apply slides");
    assert_eq!(inside, 3.0);
    assert_eq!(ctx.params(), &StyleParams::default());
}

#[test]
fn test_scoped_restores_after_error() {
    let mut ctx = bundled();
    let result: Result<Result<(), String>, StyleError> =
        ctx.with_style("paper", |_| Err("plotting failed".to_string()));
    assert_eq!(result.expect("Should apply paper"), Err("plotting failed".to_string()));
    assert_eq!(ctx.params(), &StyleParams::default());
}

#[test]
fn test_scoped_restores_after_panic() {
    let mut ctx = bundled();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _scope = ctx.scoped("paper").expect("Should apply paper");
        panic!("boom");
    }));
    assert!(outcome.is_err());
    assert_eq!(ctx.params(), &StyleParams::default());
}

#[test]
fn test_early_return_restores() {
    fn draw(ctx: &mut StyleContext) -> Result<f64, StyleError> {
        let scope = ctx.scoped("slides")?;
        let size = scope.params().font_size;
        if size > 10.0 {
            return Ok(size);
        }
        Ok(0.0)
    }

    let mut ctx = bundled();
    assert_eq!(draw(&mut ctx).expect("Should apply slides"), 16.0);
    assert_eq!(ctx.params(), &StyleParams::default());
}

#[test]
fn test_syntax_error_is_reported_with_source() {
    let (_dir, library) = library_with_notebook("font.size : 12\naxes.grid true\n");
    let mut ctx = StyleContext::new(library);
    let err = ctx.use_style("notebook").unwrap_err();
    match &err {
        StyleError::Syntax { errors, .. } => assert_eq!(errors.len(), 1),
        other => panic!("expected syntax error, got {}", other),
    }
    assert!(err.report().contains("notebook.figstyle"));
    assert_eq!(ctx.params(), &StyleParams::default());
}

#[test]
fn test_invalid_value_leaves_context_untouched() {
    let (_dir, library) = library_with_notebook("font.size : 14\naxes.grid : maybe\n");
    let mut ctx = StyleContext::new(library);
    let err = ctx.use_style("notebook").unwrap_err();
    match err {
        StyleError::InvalidValue { key, span, .. } => {
            assert_eq!(key, "axes.grid");
            assert_eq!(span, 15..32);
        }
        other => panic!("expected invalid value, got {}", other),
    }
    assert_eq!(ctx.params().font_size, 10.0);
}

#[test]
fn test_unknown_keys_are_skipped() {
    let (_dir, library) =
        library_with_notebook("# custom\nfont.size : 9\nlegend.frameon : false\n");
    let mut ctx = StyleContext::new(library);
    let (result, logs) = common::capture_logs(|| ctx.use_style("notebook"));
    result.expect("Unknown keys should not fail");
    assert_eq!(ctx.params().font_size, 9.0);

    let warning = logs
        .lines()
        .find(|line| line.contains("WARN"))
        .expect("unknown key should log a warning");
    assert!(warning.contains("ignoring unknown style key"));
    assert!(warning.contains("key=legend.frameon"));
}

#[test]
fn test_style_dir_from_environment() {
    let (dir, _library) = library_with_notebook("font.size : 21\n");
    std::env::set_var(figure_template::style::STYLE_DIR_ENV, dir.path());
    let library = StyleLibrary::from_env();
    std::env::remove_var(figure_template::style::STYLE_DIR_ENV);

    assert_eq!(library.dir(), dir.path());
    let mut ctx = StyleContext::new(library);
    ctx.use_style("notebook").expect("Should load from env dir");
    assert_eq!(ctx.params().font_size, 21.0);
}
