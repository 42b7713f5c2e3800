//! The `dragon` built-in's decorative banner.

/// A fixed ASCII-art banner, printed verbatim by the `dragon` built-in.
pub const BANNER: &str = r#"
                          ,     .
                        .   \  :  /   .
                          `.  \ | /  .'
                        .-'_   \|/   _'-.
                       '-'  `\  |  /`  '-'
                            \ \ | / /
                   ---------`-._|_.-'---------
                    .--"'_.-"| | |"-._'"--.
                   /_.-"' _.'| | |'._ '"-._\
                       .-'   | | |   '-.
                      /    .-' | '-.    \
                           |   |   |
                          /    |    \
                             dragon
"#;
