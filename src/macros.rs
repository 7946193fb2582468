#[macro_export]
macro_rules! options(
    { $($name:expr => $value:expr),* $(,)? } => {
        {
            let mut config = $crate::policy::config::MapConfig::new();
            $(
                config.set($name, $value);
            )*
            config
        }
    };
);
