//! Built-in minifying processors.
//!
//! Uses lightningcss for CSS and oxc for JavaScript.

use anyhow::{Result, anyhow, bail};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minify a stylesheet.
pub fn cssmin(source: &str) -> Result<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("failed to parse CSS: {e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("failed to print CSS: {e}"))?;
    Ok(result.code)
}

/// Minify a script (parsed as an ES module).
pub fn jsmin(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !ret.errors.is_empty() {
        bail!("failed to parse JavaScript ({} errors)", ret.errors.len());
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cssmin() {
        let css = r#"
            html {
                background-color: red;
            }
        "#;
        assert_eq!(cssmin(css).unwrap(), "html{background-color:red}");
    }

    #[test]
    fn test_cssmin_is_deterministic() {
        let css = "p { margin: 0 ; padding: 0 }";
        assert_eq!(cssmin(css).unwrap(), cssmin(css).unwrap());
    }

    #[test]
    fn test_jsmin() {
        let js = "function add(first, second) {\n    return first + second;\n}\nexport { add };\n";
        let out = jsmin(js).unwrap();
        assert!(out.len() < js.len());
        assert!(out.contains("export"));
    }

    #[test]
    fn test_jsmin_rejects_syntax_error() {
        assert!(jsmin("function (").is_err());
    }
}
