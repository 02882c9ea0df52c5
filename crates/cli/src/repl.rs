//! Interactive chat session loop.

use std::io::{self, BufRead, Write};

use runtime::{Chat, ChatOptions};
use tracing::debug;

use crate::style::{Color, Styled};

const EXIT_SENTINEL: &str = "exit";
const PROMPT: &str = "Enter a command (or 'exit' to quit):";

/// Reads queries line by line and streams each answer to the output.
///
/// One query is in flight at a time: its answer is fully written and
/// followed by a newline before the next prompt appears.
pub struct Repl<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write + Send> Repl<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until `exit` or end of input. Returns the number of queries sent.
    ///
    /// A failed query is reported and the loop continues; console I/O
    /// errors end the session.
    pub async fn run<C: Chat>(&mut self, chat: &C, options: &ChatOptions) -> io::Result<usize> {
        self.banner()?;

        let mut queries = 0;
        loop {
            self.prompt()?;

            let mut raw = Vec::new();
            if self.input.read_until(b'\n', &mut raw)? == 0 {
                debug!("end of input");
                break;
            }

            // Invalid UTF-8 is replaced, not rejected.
            let line = String::from_utf8_lossy(&raw);
            let query = line.trim_end_matches(['\r', '\n']);
            if query.eq_ignore_ascii_case(EXIT_SENTINEL) {
                break;
            }
            if query.trim().is_empty() {
                continue;
            }

            queries += 1;
            match chat.respond(query, options, &mut self.output).await {
                Ok(usage) => debug!(?usage, "query answered"),
                Err(runtime::Error::Io(e)) => return Err(e),
                Err(e) => {
                    writeln!(self.output)?;
                    eprintln!("Error: {e}");
                    continue;
                }
            }
            writeln!(self.output)?;
        }

        self.output.flush()?;
        Ok(queries)
    }

    fn banner(&mut self) -> io::Result<()> {
        let mut styled = Styled::new(&mut self.output, Color::Green, self.color)?;
        writeln!(styled, "MCP Client Started!")
    }

    fn prompt(&mut self) -> io::Result<()> {
        writeln!(self.output, "{PROMPT}")?;
        {
            let mut styled = Styled::new(&mut self.output, Color::Cyan, self.color)?;
            write!(styled, "> ")?;
        }
        self.output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{StreamExt, stream};
    use runtime::{
        Backend, ChatClient, EmptyToolHost, EventStream, FinishReason, ModelError, ModelRequest,
        StreamEvent, ToolHost, Usage,
    };
    use std::io::Cursor;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BANNER: &str = "MCP Client Started!\n";
    const PROMPT_BLOCK: &str = "Enter a command (or 'exit' to quit):\n> ";

    /// Chat stub that writes fixed fragments and counts queries.
    struct ScriptedChat {
        fragments: Vec<&'static str>,
        fail: bool,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(fragments: Vec<&'static str>) -> Self {
            Self {
                fragments,
                fail: false,
                queries: Mutex::default(),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new())
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl Chat for ScriptedChat {
        async fn respond<W: Write + Send>(
            &self,
            query: &str,
            _options: &ChatOptions,
            out: &mut W,
        ) -> runtime::Result<Usage> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(ModelError::Api("529: overloaded".into()).into());
            }
            for fragment in &self.fragments {
                out.write_all(fragment.as_bytes())?;
                out.flush()?;
            }
            Ok(Usage::default())
        }
    }

    /// Backend streaming a single answer, regardless of the request.
    struct OneTurnBackend {
        calls: AtomicUsize,
    }

    impl Backend for OneTurnBackend {
        async fn stream(&self, request: ModelRequest<'_>) -> Result<EventStream, ModelError> {
            assert!(request.tools.is_empty());
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(stream::iter(vec![
                Ok(StreamEvent::Text("No tools needed.".into())),
                Ok(StreamEvent::Finished {
                    reason: FinishReason::Stop,
                    usage: Usage::default(),
                }),
            ])
            .boxed())
        }
    }

    async fn run_session<C: Chat>(input: &str, chat: &C) -> (usize, String) {
        let mut repl = Repl::new(Cursor::new(input.to_string()), Vec::new(), false);
        let queries = repl.run(chat, &ChatOptions::default()).await.unwrap();
        let output = String::from_utf8(repl.into_output()).unwrap();
        (queries, output)
    }

    #[tokio::test]
    async fn blank_lines_reprompt_without_queries() {
        let chat = ScriptedChat::new(vec!["unused"]);
        let (queries, output) = run_session("\n   \nexit\n", &chat).await;

        assert_eq!(queries, 0);
        assert!(chat.queries().is_empty());
        assert_eq!(output, format!("{BANNER}{}", PROMPT_BLOCK.repeat(3)));
    }

    #[tokio::test]
    async fn fragments_are_joined_and_terminated_once() {
        let chat = ScriptedChat::new(vec!["Hel", "lo"]);
        let (queries, output) = run_session("greet me\nexit\n", &chat).await;

        assert_eq!(queries, 1);
        assert_eq!(chat.queries(), vec!["greet me"]);
        assert_eq!(
            output,
            format!("{BANNER}{PROMPT_BLOCK}Hello\n{PROMPT_BLOCK}")
        );
    }

    #[tokio::test]
    async fn exit_is_case_insensitive() {
        let chat = ScriptedChat::new(vec!["x"]);
        let (queries, _) = run_session("EXIT\nnever sent\n", &chat).await;
        assert_eq!(queries, 0);
    }

    #[tokio::test]
    async fn end_of_input_exits_cleanly() {
        let chat = ScriptedChat::new(vec!["ok"]);
        let (queries, output) = run_session("first\nsecond", &chat).await;

        assert_eq!(queries, 2);
        assert_eq!(chat.queries(), vec!["first", "second"]);
        assert!(output.ends_with(&format!("ok\n{PROMPT_BLOCK}")));
    }

    #[tokio::test]
    async fn windows_line_endings_are_stripped() {
        let chat = ScriptedChat::new(vec!["ok"]);
        let (queries, _) = run_session("weather?\r\nExit\r\n", &chat).await;

        assert_eq!(queries, 1);
        assert_eq!(chat.queries(), vec!["weather?"]);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_still_a_query() {
        let chat = ScriptedChat::new(vec!["ok"]);
        let input: &[u8] = b"caf\xe9?\nexit\n";
        let mut repl = Repl::new(Cursor::new(input), Vec::new(), false);

        let queries = repl.run(&chat, &ChatOptions::default()).await.unwrap();

        assert_eq!(queries, 1);
        assert_eq!(chat.queries(), vec!["caf\u{fffd}?"]);
    }

    #[tokio::test]
    async fn failed_query_returns_to_prompt() {
        let chat = ScriptedChat::failing();
        let (queries, output) = run_session("one\ntwo\nexit\n", &chat).await;

        assert_eq!(queries, 2);
        assert_eq!(chat.queries(), vec!["one", "two"]);
        assert_eq!(
            output,
            format!("{BANNER}{PROMPT_BLOCK}\n{PROMPT_BLOCK}\n{PROMPT_BLOCK}")
        );
    }

    #[tokio::test]
    async fn empty_catalog_still_answers_queries() {
        let host = EmptyToolHost;
        let options = ChatOptions::default().with_tools(host.specs().to_vec());
        let backend = OneTurnBackend {
            calls: AtomicUsize::new(0),
        };
        let client = ChatClient::new(backend, host);

        let mut repl = Repl::new(Cursor::new("what's up?\nexit\n"), Vec::new(), false);
        let queries = repl.run(&client, &options).await.unwrap();
        let output = String::from_utf8(repl.into_output()).unwrap();

        assert_eq!(queries, 1);
        assert_eq!(
            output,
            format!("{BANNER}{PROMPT_BLOCK}No tools needed.\n{PROMPT_BLOCK}")
        );
    }

    #[tokio::test]
    async fn colored_prompt_is_reset() {
        let chat = ScriptedChat::new(vec![]);
        let mut repl = Repl::new(Cursor::new("exit\n"), Vec::new(), true);
        repl.run(&chat, &ChatOptions::default()).await.unwrap();
        let output = String::from_utf8(repl.into_output()).unwrap();

        assert!(output.contains("MCP Client Started!"));
        assert!(output.contains("> "));
        assert!(output.ends_with("\u{1b}[0m"));
    }
}
