//! Process-backed collaborators
//!
//! Layout, typesetting, rasterizing and font lookup are done by spawning the
//! usual command-line tools and piping documents through them.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Result;
use tracing::{debug, span, Level};

use suml::core::{DiagramError, FontProbe, Rasterizer, RenderBackend};

/// Pipe `input` through `program` and collect its standard output.
///
/// A tool that cannot be started or exits unsuccessfully is a backend error.
pub fn run_tool(program: &str, args: &[&str], input: &[u8]) -> Result<Vec<u8>> {
    let tool_span = span!(Level::DEBUG, "run_tool", program, input_len = input.len());
    let _enter = tool_span.enter();

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| DiagramError::backend(program, format!("failed to start: {}", e)))?;

    // Feed stdin from a separate thread so a chatty tool cannot fill its
    // stdout pipe while we are still writing.
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| DiagramError::backend(program, "stdin was not captured"))?;
    let payload = input.to_vec();
    let writer = std::thread::spawn(move || stdin.write_all(&payload));

    let output = child
        .wait_with_output()
        .map_err(|e| DiagramError::backend(program, e.to_string()))?;
    let written = writer.join();

    // A tool that quit early breaks the pipe; its exit status says more.
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiagramError::backend(
            program,
            format!("{}: {}", output.status, stderr.trim()),
        )
        .into());
    }
    match written {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(DiagramError::backend(program, e.to_string()).into()),
        Err(_) => return Err(DiagramError::backend(program, "stdin writer panicked").into()),
    }

    debug!(output_len = output.stdout.len(), "Tool finished");
    Ok(output.stdout)
}

fn run_text_tool(program: &str, args: &[&str], input: &str) -> Result<String> {
    let stdout = run_tool(program, args, input.as_bytes())?;
    String::from_utf8(stdout)
        .map_err(|e| DiagramError::backend(program, format!("output is not UTF-8: {}", e)).into())
}

/// Graphviz `dot` for graphs, plotutils `pic2plot` for sequence pictures
#[derive(Debug, Clone, Default)]
pub struct ToolBackend;

impl RenderBackend for ToolBackend {
    fn render_graph(&self, markup: &str) -> Result<String> {
        run_text_tool("dot", &["-Tsvg"], markup)
    }

    fn render_pic(&self, markup: &str) -> Result<String> {
        run_text_tool("pic2plot", &["-Tsvg"], markup)
    }
}

/// ImageMagick `convert`
#[derive(Debug, Clone, Default)]
pub struct ImageMagick;

impl Rasterizer for ImageMagick {
    fn rasterize(&self, svg: &str) -> Result<Vec<u8>> {
        run_tool("convert", &["svg:-", "png:-"], svg.as_bytes())
    }

    fn autocrop(&self, bitmap: &[u8]) -> Result<Vec<u8>> {
        run_tool("convert", &["png:-", "-trim", "+repage", "png:-"], bitmap)
    }
}

/// Fontconfig `fc-list`
#[derive(Debug, Clone, Default)]
pub struct FcList;

impl FontProbe for FcList {
    fn font_installed(&self, name: &str) -> bool {
        match run_tool("fc-list", &[name], &[]) {
            Ok(stdout) => !String::from_utf8_lossy(&stdout).trim().is_empty(),
            Err(e) => {
                debug!(font = name, error = %e, "Font lookup failed");
                false
            }
        }
    }
}
