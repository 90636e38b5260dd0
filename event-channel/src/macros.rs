#[macro_export]
macro_rules! sink {
    ($handler:ident.$method:ident) => {
        $crate::FnSink::new({
            let handler = $handler.clone(); // Clone the handler
            move |event| {
                handler.$method(event); // Call the method on the handler
            }
        })
    };
}
