use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Expr, GenericArgument, Ident, PathArguments, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    token,
};

/// How a field is represented in the generated `Partial*` struct.
enum FieldKind {
    /// `field: Type = default`. The partial field is `Option<Type>`, or `Type`
    /// itself when it already is an `Option`.
    Plain,
    /// `field: Type (PartialType = default)`. Used for nested config structs,
    /// where the partial field is e.g. `Option<PartialLoggerConfig>`.
    Nested(Type),
}

struct ConfigField {
    name: Ident,
    ty: Type,
    default_value: Expr,
    kind: FieldKind,
}

impl Parse for ConfigField {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;

        if input.peek(token::Paren) {
            let content;
            syn::parenthesized!(content in input);
            let partial_ty: Type = content.parse()?;
            content.parse::<Token![=]>()?;
            let default_value: Expr = content.parse()?;

            return Ok(ConfigField {
                name,
                ty,
                default_value,
                kind: FieldKind::Nested(partial_ty),
            });
        }

        input.parse::<Token![=]>()?;
        let default_value: Expr = input.parse()?;

        Ok(ConfigField {
            name,
            ty,
            default_value,
            kind: FieldKind::Plain,
        })
    }
}

impl ConfigField {
    fn definition(&self) -> TokenStream2 {
        let ConfigField { name, ty, .. } = self;
        quote! { #name: #ty }
    }

    fn partial_definition(&self) -> TokenStream2 {
        let ConfigField { name, ty, .. } = self;
        match &self.kind {
            FieldKind::Nested(partial_ty) => quote! { #name: #partial_ty },
            FieldKind::Plain if is_option(ty) => quote! { #name: #ty },
            FieldKind::Plain => quote! { #name: Option<#ty> },
        }
    }

    fn default_assignment(&self) -> TokenStream2 {
        let ConfigField {
            name,
            default_value,
            ..
        } = self;
        quote! { #name: #default_value }
    }

    fn partial_assignment(&self) -> TokenStream2 {
        let ConfigField {
            name,
            default_value,
            ..
        } = self;
        quote! { #name: partial.#name.into_or(#default_value) }
    }

    fn accessors(&self) -> TokenStream2 {
        let ConfigField { name, ty, .. } = self;
        let with_name = format_ident!("with_{}", name);
        let set_name = format_ident!("set_{}", name);
        let get_name = format_ident!("get_{}", name);

        quote! {
            pub fn #with_name(mut self, #name: #ty) -> Self {
                self.#name = #name;
                self
            }

            pub fn #set_name(&mut self, #name: #ty) {
                self.#name = #name;
            }

            pub fn #get_name(&self) -> &#ty {
                &self.#name
            }
        }
    }
}

struct ConfigInput {
    vis: Visibility,
    name: Ident,
    fields: Punctuated<ConfigField, Token![,]>,
}

impl Parse for ConfigInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let vis: Visibility = input.parse()?;
        input.parse::<Token![struct]>()?;
        let name: Ident = input.parse()?;
        let content;
        syn::braced!(content in input);
        let fields = content.parse_terminated(ConfigField::parse, Token![,])?;
        Ok(ConfigInput { vis, name, fields })
    }
}

/// Checks whether a type is spelled `Option<T>`, so that we don't wrap it a
/// second time in the partial struct.
fn is_option(ty: &Type) -> bool {
    let Type::Path(tp) = ty else {
        return false;
    };
    let Some(seg) = tp.path.segments.last() else {
        return false;
    };
    if seg.ident != "Option" {
        return false;
    }

    match &seg.arguments {
        PathArguments::AngleBracketed(args) => {
            args.args.len() == 1 && matches!(args.args[0], GenericArgument::Type(_))
        }
        _ => false,
    }
}

/// Generates a configuration struct together with a `Partial*` counterpart
/// that can be deserialized from TOML with any subset of fields present.
///
/// ```ignore
/// config! {
///     pub struct LoggerConfig {
///         enabled: bool = false,
///         log_level: LogLevel = LogLevel::Warn,
///     }
/// }
/// ```
///
/// The macro expects `crate::config::IntoOr` to be in scope of the invoking
/// crate, and `serde`, `toml` and `anyhow` to be dependencies of it.
#[proc_macro]
pub fn config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ConfigInput);
    let vis = &input.vis;
    let struct_name = &input.name;
    let partial_struct_name = format_ident!("Partial{}", struct_name);

    let fields = input.fields.iter().map(ConfigField::definition);
    let partial_fields = input.fields.iter().map(ConfigField::partial_definition);
    let default_assignments = input.fields.iter().map(ConfigField::default_assignment);
    let partial_assignments = input.fields.iter().map(ConfigField::partial_assignment);
    let accessors = input.fields.iter().map(ConfigField::accessors);

    let expanded = quote! {
        #[derive(Debug, Clone, serde::Serialize)]
        #vis struct #struct_name {
            #( #fields, )*
        }

        #[derive(Debug, Clone, Default, serde::Deserialize)]
        #[serde(default)]
        #vis struct #partial_struct_name {
            #( #partial_fields, )*
        }

        impl #struct_name {
            pub fn from_partial(partial: #partial_struct_name) -> Self {
                use crate::config::IntoOr;
                Self {
                    #( #partial_assignments, )*
                }
            }

            pub fn from_toml(content: &str) -> anyhow::Result<Self> {
                Ok(Self::from_partial(toml::from_str(content)?))
            }

            pub fn from_file<P: AsRef<std::path::Path>>(file_path: P) -> anyhow::Result<Self> {
                let path = file_path.as_ref();
                let content = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("failed to read config file {}: {}", path.display(), e)
                })?;
                Self::from_toml(&content)
            }

            pub fn from_optional_file<P: AsRef<std::path::Path>>(file_path: Option<P>) -> anyhow::Result<Self> {
                match file_path {
                    Some(p) => Self::from_file(p),
                    None => Ok(Self::default()),
                }
            }

            #( #accessors )*
        }

        impl Default for #struct_name {
            fn default() -> Self {
                #struct_name {
                    #( #default_assignments, )*
                }
            }
        }

        impl crate::config::IntoOr<#struct_name> for Option<#partial_struct_name> {
            fn into_or(self, or: #struct_name) -> #struct_name {
                match self {
                    Some(partial) => #struct_name::from_partial(partial),
                    None => or,
                }
            }
        }
    };

    TokenStream::from(expanded)
}
