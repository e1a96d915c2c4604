use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Fields, Ident};

fn parse_unit_enum(input: TokenStream, derive_name: &str) -> (Ident, DataEnum) {
    let ast: DeriveInput = syn::parse(input).expect("unable to parse input");

    let name = ast.ident;
    let Data::Enum(data) = ast.data else {
        panic!("{derive_name} can only be applied to enums; {name} is not an enum");
    };

    for variant in &data.variants {
        let variant_name = &variant.ident;
        assert!(
            matches!(variant.fields, Fields::Unit),
            "{derive_name} only supports fieldless variants; {name}::{variant_name} has fields"
        );
    }

    (name, data)
}

fn variant_arms(data: &DataEnum, arm: impl Fn(&Ident) -> TokenStream2) -> Vec<TokenStream2> {
    data.variants.iter().map(|variant| arm(&variant.ident)).collect()
}

pub fn enum_display(input: TokenStream) -> TokenStream {
    let (name, data) = parse_unit_enum(input, "EnumDisplay");

    let match_arms = variant_arms(&data, |variant_name| {
        let variant_name_str = variant_name.to_string();
        quote! {
            Self::#variant_name => #variant_name_str
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn to_str(&self) -> &'static str {
                match self {
                    #(#match_arms,)*
                }
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.to_str())
            }
        }
    };

    expanded.into()
}

pub fn enum_from_str(input: TokenStream) -> TokenStream {
    let (name, data) = parse_unit_enum(input, "EnumFromStr");

    let match_arms = variant_arms(&data, |variant_name| {
        let variant_name_lowercase = variant_name.to_string().to_ascii_lowercase();
        quote! {
            #variant_name_lowercase => ::std::result::Result::Ok(Self::#variant_name)
        }
    });

    let err_fmt_string = format!("invalid {name} string: '{{}}'");
    let expanded = quote! {
        impl ::std::str::FromStr for #name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    #(#match_arms,)*
                    _ => ::std::result::Result::Err(::std::format!(#err_fmt_string, s))
                }
            }
        }
    };

    expanded.into()
}

pub fn enum_all(input: TokenStream) -> TokenStream {
    let (name, data) = parse_unit_enum(input, "EnumAll");

    let variants = variant_arms(&data, |variant_name| quote! { Self::#variant_name });
    let num_variants = variants.len();

    let expanded = quote! {
        impl #name {
            pub const ALL: [Self; #num_variants] = [#(#variants,)*];
        }
    };

    expanded.into()
}

pub fn custom_value_enum(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).expect("unable to parse input");
    let name = &ast.ident;

    let expanded = quote! {
        impl ::clap::ValueEnum for #name {
            fn value_variants<'a>() -> &'a [Self] {
                &Self::ALL
            }

            fn to_possible_value(&self) -> ::std::option::Option<::clap::builder::PossibleValue> {
                ::std::option::Option::Some(::clap::builder::PossibleValue::new(self.to_str()))
            }
        }
    };

    expanded.into()
}
