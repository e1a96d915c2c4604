mod enums;

use proc_macro::TokenStream;

/// Implements `Display` for a fieldless enum, printing each variant's name. Also adds an inherent
/// `to_str()` returning the same string.
#[proc_macro_derive(EnumDisplay)]
pub fn enum_display(input: TokenStream) -> TokenStream {
    enums::enum_display(input)
}

/// Implements `FromStr` for a fieldless enum. Variant names are matched case-insensitively.
#[proc_macro_derive(EnumFromStr)]
pub fn enum_from_str(input: TokenStream) -> TokenStream {
    enums::enum_from_str(input)
}

/// Adds an `ALL` constant listing every variant in declaration order.
#[proc_macro_derive(EnumAll)]
pub fn enum_all(input: TokenStream) -> TokenStream {
    enums::enum_all(input)
}

/// Implements `clap::ValueEnum` using `ALL` and `to_str()`, so the enum must also derive
/// `EnumAll` and `EnumDisplay`.
#[proc_macro_derive(CustomValueEnum)]
pub fn custom_value_enum(input: TokenStream) -> TokenStream {
    enums::custom_value_enum(input)
}
