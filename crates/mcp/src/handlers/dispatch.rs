#![forbid(unsafe_code)]

use crate::McpServer;
use serde_json::Value;

macro_rules! define_dispatch {
    ($($tool_name:literal => $method:ident),* $(,)?) => {
        pub(crate) fn dispatch_handler(
            server: &mut McpServer,
            name: &str,
            args: Value,
        ) -> Option<Value> {
            let resp = match name {
                $($tool_name => server.$method(args),)*
                _ => return None,
            };
            Some(resp)
        }

        #[cfg(test)]
        pub(crate) fn dispatch_handler_names() -> &'static [&'static str] {
            &[$($tool_name),*]
        }
    };
}

define_dispatch! {
    "gsheets_load_hypotheses" => tool_load_hypotheses,
    "gsheets_get_hypothesis" => tool_get_hypothesis,
    "gsheets_update_hypotheses" => tool_update_hypotheses,
    "gsheets_record_analysis" => tool_record_analysis,
    "gsheets_describe" => tool_describe,
}
