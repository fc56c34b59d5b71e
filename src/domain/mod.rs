pub mod cart;
pub mod language;
pub mod order;
pub mod page;
pub mod product;
pub mod upload;

pub use cart::{Cart, CartLine};
pub use language::Language;
pub use order::{Order, OrderItem, OrderReceipt, OrderRequest, OrderStatus, StatusUpdate};
pub use page::PageResult;
pub use product::{format_price, to_paise, Product, Thumbnail};
pub use upload::{Attachment, ProductUpload};
